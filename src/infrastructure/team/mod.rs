//! Team backends

mod github;
mod request;

pub use github::{GitHubEndpoints, GitHubOrganization, GITHUB_ORGANIZATION_BACKEND};
pub use request::request_json;
