// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use kube::CustomResourceExt;
use kube::core::crd::merge_crds;

use crate::crd::v1alpha1::stack::Stack as V1Alpha1Stack;
use crate::error::{ControllerError, Result};


/// Render the CRDs for the operator as a multi-document YAML string
pub fn render_crds() -> Result<String> {
    let mut rendered = String::new();

    for crd in vec![
        merge_crds(vec![V1Alpha1Stack::crd()], "v1alpha1")
            .map_err(|e| ControllerError::CrdError(e.to_string()))?,
    ] {
        rendered.push_str("---\n");
        rendered.push_str(
            &serde_norway::to_string(&crd).map_err(|e| ControllerError::CrdError(e.to_string()))?
        );
    }

    Ok(rendered)
}

/// Generate the CRDs for the operator
pub fn generate_crds() -> Result<()> {
    print!("{}", render_crds()?);
    Ok(())
}
