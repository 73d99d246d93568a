//! Credential resolution and token sources
//!
//! [`CredentialResolver`] turns a [`mailroute_domain::CredentialBundle`] into
//! a [`mailroute_core::TokenSource`]:
//!
//! 1. an explicit access token wins outright ([`StaticTokenSource`]);
//! 2. otherwise the configured credential JSON (inline or a path);
//! 3. otherwise ambient credentials (`GOOGLE_APPLICATION_CREDENTIALS`, then
//!    the gcloud well-known file).
//!
//! Service account keys mint tokens through the JWT-bearer grant
//! ([`ServiceAccountTokenSource`]); authorized user secrets through the
//! refresh-token grant ([`AuthorizedUserTokenSource`]).

pub mod authorized_user;
pub mod credentials_file;
pub mod resolver;
pub mod service_account;
pub mod static_token;
mod token;
pub mod validation;

pub use authorized_user::AuthorizedUserTokenSource;
pub use credentials_file::{parse_credential_json, AuthorizedUserSecret, CredentialFile, ServiceAccountKey};
pub use resolver::{AmbientCredentials, CredentialResolver};
pub use service_account::ServiceAccountTokenSource;
pub use static_token::StaticTokenSource;
pub use validation::{validate_credentials, Diagnostic, Severity};
