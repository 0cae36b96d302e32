// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

//! Git credential resolution against an in-memory Secret store

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use serial_test::serial;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;
use gitauth_operator_common::telemetry::Span;

use gitauth_operator_controller::crd::v1alpha1::common::{BasicAuth, GitAuthConfig, ResourceRef, SshAuth};
use gitauth_operator_controller::crd::v1alpha1::stack::StackSpec;
use gitauth_operator_controller::git_auth::{
    GitAuth, GitAuthError, GitAuthResult, GitAuthSession, GitAuthSource, SecretFetcher,
};

const NAMESPACE: &str = "test";
const SECRET_NAME: &str = "fake-secret";

#[derive(Default)]
struct FakeSecrets {
    secrets: BTreeMap<(String, String), Secret>,
    fetches: AtomicUsize,
}

impl FakeSecrets {
    fn with_secret(mut self, namespace: &str, name: &str, data: &[(&str, &str)]) -> Self {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            data: Some(
                data.iter()
                    .map(|(key, value)| (key.to_string(), ByteString(value.as_bytes().to_vec())))
                    .collect(),
            ),
            type_: Some("Opaque".to_string()),
            ..Default::default()
        };
        self.secrets.insert((namespace.to_string(), name.to_string()), secret);
        self
    }
}

#[async_trait]
impl SecretFetcher for FakeSecrets {
    async fn get_secret(&self, namespace: &str, name: &str) -> GitAuthResult<Secret> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| GitAuthError::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

fn legacy_secrets() -> FakeSecrets {
    FakeSecrets::default()
        .with_secret(NAMESPACE, "sshPrivateKey", &[("sshPrivateKey", "very secret key")])
        .with_secret(NAMESPACE, "sshPrivateKeyWithPassword", &[
            ("sshPrivateKey", "very secret key"),
            ("password", "moar secret password"),
        ])
        .with_secret(NAMESPACE, "accessToken", &[("accessToken", "super secret access token")])
        .with_secret(NAMESPACE, "basicAuth", &[
            ("username", "not so secret username"),
            ("password", "very secret password"),
        ])
        .with_secret(NAMESPACE, "basicAuthWithoutPassword", &[("username", "not so secret username")])
        .with_secret(NAMESPACE, "unrecognized", &[("token", "ignored")])
}

fn ref_secrets() -> FakeSecrets {
    FakeSecrets::default()
        .with_secret(NAMESPACE, SECRET_NAME, &[("SECRET1", "very secret"), ("SECRET2", "moar secret")])
}

fn secret_ref(key: &str) -> ResourceRef {
    ResourceRef::secret(Some(NAMESPACE), SECRET_NAME, key)
}

async fn resolve_legacy(fetcher: &FakeSecrets, name: &str) -> GitAuthResult<GitAuth> {
    GitAuthSession::new(fetcher, NAMESPACE, Span::none())
        .setup_git_auth(GitAuthSource::LegacySecret(name))
        .await
}

async fn resolve_config(fetcher: &FakeSecrets, config: &GitAuthConfig) -> GitAuthResult<GitAuth> {
    GitAuthSession::new(fetcher, NAMESPACE, Span::none())
        .setup_git_auth(GitAuthSource::Config(config))
        .await
}

fn token_config(token: ResourceRef) -> GitAuthConfig {
    GitAuthConfig { access_token: Some(token), ..Default::default() }
}

// Legacy gitAuthSecret

#[tokio::test]
async fn legacy_missing_secret() {
    let err = resolve_legacy(&legacy_secrets(), "MISSING").await.unwrap_err();

    assert!(err.to_string().contains("secrets \"MISSING\" not found"));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn legacy_ssh_private_key() {
    let auth = resolve_legacy(&legacy_secrets(), "sshPrivateKey").await.unwrap();

    assert_eq!(auth, GitAuth {
        ssh_private_key: Some("very secret key".to_string()),
        ..Default::default()
    });
}

#[tokio::test]
async fn legacy_ssh_private_key_with_password() {
    let auth = resolve_legacy(&legacy_secrets(), "sshPrivateKeyWithPassword").await.unwrap();

    assert_eq!(auth, GitAuth {
        ssh_private_key: Some("very secret key".to_string()),
        password: Some("moar secret password".to_string()),
        ..Default::default()
    });
}

#[tokio::test]
async fn legacy_access_token() {
    let auth = resolve_legacy(&legacy_secrets(), "accessToken").await.unwrap();

    assert_eq!(auth, GitAuth {
        personal_access_token: Some("super secret access token".to_string()),
        ..Default::default()
    });
}

#[tokio::test]
async fn legacy_basic_auth() {
    let auth = resolve_legacy(&legacy_secrets(), "basicAuth").await.unwrap();

    assert_eq!(auth, GitAuth {
        username: Some("not so secret username".to_string()),
        password: Some("very secret password".to_string()),
        ..Default::default()
    });
}

#[tokio::test]
async fn legacy_basic_auth_without_password() {
    let err = resolve_legacy(&legacy_secrets(), "basicAuthWithoutPassword").await.unwrap_err();

    assert!(err.to_string().contains("missing 'password' secret entry"));
    assert!(err.is_validation());
}

#[tokio::test]
async fn legacy_secret_without_recognized_entries() {
    let auth = resolve_legacy(&legacy_secrets(), "unrecognized").await.unwrap();

    assert_eq!(auth, GitAuth::default());
}

#[tokio::test]
async fn legacy_ssh_key_takes_precedence() {
    let fetcher = FakeSecrets::default().with_secret(NAMESPACE, "mixed", &[
        ("sshPrivateKey", "key"),
        ("accessToken", "token"),
        ("username", "user"),
    ]);

    let auth = resolve_legacy(&fetcher, "mixed").await.unwrap();

    assert_eq!(auth, GitAuth { ssh_private_key: Some("key".to_string()), ..Default::default() });
}

#[tokio::test]
async fn legacy_secret_is_read_from_resource_namespace() {
    let fetcher = FakeSecrets::default().with_secret("other", "accessToken", &[("accessToken", "elsewhere")]);

    let err = resolve_legacy(&fetcher, "accessToken").await.unwrap_err();

    assert!(matches!(err, GitAuthError::SecretNotFound { ref namespace, .. } if namespace == NAMESPACE));
}

// Structured gitAuth

#[tokio::test]
async fn no_git_auth_configured() {
    let fetcher = ref_secrets();
    let spec = StackSpec {
        project_repo: "https://github.com/example/infra".to_string(),
        branch: None,
        commit: None,
        repo_dir: None,
        git_auth_secret: None,
        git_auth: None,
    };

    let auth = GitAuthSession::new(&fetcher, NAMESPACE, Span::none())
        .setup_git_auth(GitAuthSource::from(&spec))
        .await
        .unwrap();

    assert_eq!(auth, GitAuth::default());
    assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_git_auth() {
    let err = resolve_config(&ref_secrets(), &GitAuthConfig::default()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "gitAuth config must specify exactly one of 'personalAccessToken', 'sshPrivateKey' or 'basicAuth'"
    );
}

#[tokio::test]
async fn ambiguous_git_auth() {
    let fetcher = ref_secrets();
    let config = GitAuthConfig {
        access_token: Some(secret_ref("SECRET1")),
        ssh_auth: Some(SshAuth { ssh_private_key: secret_ref("SECRET2"), password: None }),
        ..Default::default()
    };

    let err = resolve_config(&fetcher, &config).await.unwrap_err();

    assert!(matches!(err, GitAuthError::InvalidConfig));
    assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_secret_reference() {
    let auth = resolve_config(&ref_secrets(), &token_config(secret_ref("SECRET1"))).await.unwrap();

    assert_eq!(auth, GitAuth {
        personal_access_token: Some("very secret".to_string()),
        ..Default::default()
    });
}

#[tokio::test]
async fn secret_reference_defaults_to_resource_namespace() {
    let config = token_config(ResourceRef::secret(None, SECRET_NAME, "SECRET2"));

    let auth = resolve_config(&ref_secrets(), &config).await.unwrap();

    assert_eq!(auth.personal_access_token.as_deref(), Some("moar secret"));
}

#[tokio::test]
async fn invalid_secret_reference() {
    let err = resolve_config(&ref_secrets(), &token_config(secret_ref("MISSING"))).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "resolving gitAuth personal access token: No key MISSING found in secret test/fake-secret"
    );
}

#[tokio::test]
async fn missing_secret_reference() {
    let config = token_config(ResourceRef::secret(Some(NAMESPACE), "MISSING", "SECRET1"));

    let err = resolve_config(&ref_secrets(), &config).await.unwrap_err();

    assert!(err.to_string().starts_with("resolving gitAuth personal access token: "));
    assert!(err.to_string().contains("secrets \"MISSING\" not found"));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn valid_file_reference() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"super secret").unwrap();

    let auth = resolve_config(&ref_secrets(), &token_config(ResourceRef::file(file.path()))).await.unwrap();

    assert_eq!(auth, GitAuth {
        personal_access_token: Some("super secret".to_string()),
        ..Default::default()
    });
}

#[tokio::test]
async fn invalid_file_reference() {
    let err = resolve_config(&ref_secrets(), &token_config(ResourceRef::file("/tmp/!@#@!#")))
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("resolving gitAuth personal access token: open /tmp/!@#@!#: "));
    assert!(err.to_string().to_lowercase().contains("no such file or directory"));
}

#[tokio::test]
#[serial(env)]
async fn valid_env_reference() {
    std::env::set_var("GITAUTH_TEST_SECRET3", "so secret");

    let result = resolve_config(&ref_secrets(), &token_config(ResourceRef::env("GITAUTH_TEST_SECRET3"))).await;
    std::env::remove_var("GITAUTH_TEST_SECRET3");

    assert_eq!(result.unwrap(), GitAuth {
        personal_access_token: Some("so secret".to_string()),
        ..Default::default()
    });
}

#[tokio::test]
#[serial(env)]
async fn empty_env_reference() {
    std::env::set_var("GITAUTH_TEST_EMPTY", "");

    let result = resolve_config(&ref_secrets(), &token_config(ResourceRef::env("GITAUTH_TEST_EMPTY"))).await;
    std::env::remove_var("GITAUTH_TEST_EMPTY");

    assert_eq!(result.unwrap().personal_access_token.as_deref(), Some(""));
}

#[tokio::test]
#[serial(env)]
async fn invalid_env_reference() {
    std::env::remove_var("GITAUTH_TEST_MISSING");

    let err = resolve_config(&ref_secrets(), &token_config(ResourceRef::env("GITAUTH_TEST_MISSING")))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("missing value for environment variable: GITAUTH_TEST_MISSING"));
}

#[tokio::test]
async fn ssh_auth_without_password() {
    let config = GitAuthConfig {
        ssh_auth: Some(SshAuth { ssh_private_key: secret_ref("SECRET1"), password: None }),
        ..Default::default()
    };

    let auth = resolve_config(&ref_secrets(), &config).await.unwrap();

    assert_eq!(auth, GitAuth {
        ssh_private_key: Some("very secret".to_string()),
        ..Default::default()
    });
}

#[tokio::test]
async fn ssh_auth_with_password() {
    let config = GitAuthConfig {
        ssh_auth: Some(SshAuth {
            ssh_private_key: secret_ref("SECRET1"),
            password: Some(secret_ref("SECRET2")),
        }),
        ..Default::default()
    };

    let auth = resolve_config(&ref_secrets(), &config).await.unwrap();

    assert_eq!(auth, GitAuth {
        ssh_private_key: Some("very secret".to_string()),
        password: Some("moar secret".to_string()),
        ..Default::default()
    });
}

#[tokio::test]
async fn ssh_auth_with_invalid_password() {
    let config = GitAuthConfig {
        ssh_auth: Some(SshAuth {
            ssh_private_key: secret_ref("SECRET1"),
            password: Some(secret_ref("MISSING")),
        }),
        ..Default::default()
    };

    let err = resolve_config(&ref_secrets(), &config).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "resolving gitAuth SSH password: No key MISSING found in secret test/fake-secret"
    );
}

#[tokio::test]
async fn ssh_auth_with_invalid_private_key() {
    let config = GitAuthConfig {
        ssh_auth: Some(SshAuth { ssh_private_key: secret_ref("MISSING"), password: None }),
        ..Default::default()
    };

    let err = resolve_config(&ref_secrets(), &config).await.unwrap_err();

    assert!(err.to_string().starts_with("resolving gitAuth SSH private key: "));
}

#[tokio::test]
async fn valid_basic_auth() {
    let config = GitAuthConfig {
        basic_auth: Some(BasicAuth {
            user_name: secret_ref("SECRET1"),
            password: secret_ref("SECRET2"),
        }),
        ..Default::default()
    };

    let auth = resolve_config(&ref_secrets(), &config).await.unwrap();

    assert_eq!(auth, GitAuth {
        username: Some("very secret".to_string()),
        password: Some("moar secret".to_string()),
        ..Default::default()
    });
}

#[tokio::test]
async fn basic_auth_with_invalid_references() {
    let bad_username = GitAuthConfig {
        basic_auth: Some(BasicAuth { user_name: secret_ref("MISSING"), password: secret_ref("SECRET2") }),
        ..Default::default()
    };
    let bad_password = GitAuthConfig {
        basic_auth: Some(BasicAuth { user_name: secret_ref("SECRET1"), password: secret_ref("MISSING") }),
        ..Default::default()
    };

    let username_err = resolve_config(&ref_secrets(), &bad_username).await.unwrap_err();
    let password_err = resolve_config(&ref_secrets(), &bad_password).await.unwrap_err();

    assert!(username_err.to_string().starts_with("resolving gitAuth username: No key MISSING"));
    assert!(password_err.to_string().starts_with("resolving gitAuth password: No key MISSING"));
}

#[tokio::test]
async fn resolution_is_idempotent() {
    let fetcher = ref_secrets();
    let config = token_config(secret_ref("SECRET1"));

    let first = resolve_config(&fetcher, &config).await.unwrap();
    let second = resolve_config(&fetcher, &config).await.unwrap();

    assert_eq!(first, second);
}
