//! Pipeline stages.

use std::fmt;
use std::sync::Arc;

use crate::docs::{DescriptionEndpoint, DocsUiEndpoint};
use crate::pipeline::https_redirect::HttpsRedirect;
use crate::routing::RouteTable;

/// Identity of a stage, independent of its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    ApiDescription,
    DocsUi,
    HttpsRedirection,
    RouteDispatch,
}

impl StageKind {
    /// Position in the fixed stage order; lower runs first.
    pub fn rank(self) -> u8 {
        match self {
            StageKind::ApiDescription => 0,
            StageKind::DocsUi => 1,
            StageKind::HttpsRedirection => 2,
            StageKind::RouteDispatch => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::ApiDescription => "api_description",
            StageKind::DocsUi => "docs_ui",
            StageKind::HttpsRedirection => "https_redirection",
            StageKind::RouteDispatch => "route_dispatch",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured stage.
#[derive(Debug, Clone)]
pub enum Stage {
    ApiDescription(DescriptionEndpoint),
    DocsUi(DocsUiEndpoint),
    HttpsRedirection(HttpsRedirect),
    RouteDispatch(Arc<RouteTable>),
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::ApiDescription(_) => StageKind::ApiDescription,
            Stage::DocsUi(_) => StageKind::DocsUi,
            Stage::HttpsRedirection(_) => StageKind::HttpsRedirection,
            Stage::RouteDispatch(_) => StageKind::RouteDispatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_follows_declaration_order() {
        let kinds = [
            StageKind::ApiDescription,
            StageKind::DocsUi,
            StageKind::HttpsRedirection,
            StageKind::RouteDispatch,
        ];
        assert!(kinds.windows(2).all(|w| w[0].rank() < w[1].rank()));
    }
}
