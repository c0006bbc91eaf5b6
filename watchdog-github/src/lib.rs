pub mod site;
pub mod transport;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use site::GitHubApiSite;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use workflow::{fetch_workflow_file, get_workflow_file};
