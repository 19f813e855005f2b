//! Package list filters and the filter tree shown beside the package list

use serde::Serialize;

use crate::core::browser::PackageRow;
use crate::core::classify::InstallReason;
use crate::db::{Package, Repository};

/// Restriction on the install status of listed packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    Any,
    Installed,
    NotInstalled,
    Explicit,
    Dependency,
    Optional,
    Orphan,
    /// Installed packages found in no sync repository
    Foreign,
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, reason: InstallReason, is_foreign: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Installed => reason.is_installed(),
            Self::NotInstalled => !reason.is_installed(),
            Self::Explicit => reason == InstallReason::Explicit,
            Self::Dependency => reason == InstallReason::Dependency,
            Self::Optional => reason == InstallReason::Optional,
            Self::Orphan => reason == InstallReason::Orphan,
            Self::Foreign => is_foreign,
        }
    }
}

/// Active filters for the package list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageFilter {
    pub status: StatusFilter,
    pub repo: Option<String>,
    pub group: Option<String>,
    pub search: Option<String>,
}

impl PackageFilter {
    #[must_use]
    pub fn status(status: StatusFilter) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Whether a catalog row is visible under this filter
    #[must_use]
    pub fn matches(&self, pkg: &Package, reason: InstallReason, is_foreign: bool) -> bool {
        if !self.status.matches(reason, is_foreign) {
            return false;
        }
        if let Some(repo) = &self.repo
            && pkg.repo != *repo
        {
            return false;
        }
        if let Some(group) = &self.group
            && !pkg.groups.iter().any(|g| g == group)
        {
            return false;
        }
        if let Some(text) = &self.search {
            let needle = text.trim().to_lowercase();
            if !pkg.name.to_lowercase().contains(&needle)
                && !pkg.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    /// Number of already classified rows this filter keeps
    #[must_use]
    pub fn count(&self, rows: &[PackageRow]) -> usize {
        rows.iter()
            .filter(|row| self.matches(&row.package, row.reason, row.foreign))
            .count()
    }
}

/// One entry of the filter tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterNode {
    pub title: String,
    pub filter: PackageFilter,
    pub children: Vec<FilterNode>,
}

impl FilterNode {
    fn leaf(title: &str, filter: PackageFilter) -> Self {
        Self {
            title: title.to_string(),
            filter,
            children: Vec::new(),
        }
    }
}

/// Status nodes, one node per sync repository with its groups, then Foreign
#[must_use]
pub fn filter_tree(sync: &[Repository]) -> Vec<FilterNode> {
    let mut nodes = vec![
        FilterNode::leaf("All Packages", PackageFilter::default()),
        FilterNode::leaf("Installed", PackageFilter::status(StatusFilter::Installed)),
        FilterNode::leaf("Explicit", PackageFilter::status(StatusFilter::Explicit)),
        FilterNode::leaf("Dependency", PackageFilter::status(StatusFilter::Dependency)),
        FilterNode::leaf("Optional", PackageFilter::status(StatusFilter::Optional)),
        FilterNode::leaf("Orphan", PackageFilter::status(StatusFilter::Orphan)),
    ];

    for repo in sync {
        let repo_filter = PackageFilter {
            repo: Some(repo.name().to_string()),
            ..PackageFilter::default()
        };
        let children = repo
            .groups()
            .into_keys()
            .map(|group| {
                FilterNode::leaf(
                    group,
                    PackageFilter {
                        group: Some(group.to_string()),
                        ..repo_filter.clone()
                    },
                )
            })
            .collect();
        nodes.push(FilterNode {
            title: repo.name().to_string(),
            filter: repo_filter,
            children,
        });
    }

    nodes.push(FilterNode::leaf(
        "Foreign",
        PackageFilter::status(StatusFilter::Foreign),
    ));
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filters() {
        use InstallReason::*;
        assert!(StatusFilter::Installed.matches(Orphan, false));
        assert!(!StatusFilter::Installed.matches(NotInstalled, false));
        assert!(StatusFilter::NotInstalled.matches(NotInstalled, false));
        assert!(StatusFilter::Foreign.matches(Explicit, true));
        assert!(!StatusFilter::Foreign.matches(Explicit, false));
        assert!(!StatusFilter::Explicit.matches(Dependency, false));
    }

    #[test]
    fn test_repo_group_and_search() {
        let pkg = Package::new("xterm", "395-1")
            .with_repo("extra")
            .with_description("X Terminal Emulator")
            .with_groups(&["xorg-apps"]);

        let mut filter = PackageFilter {
            repo: Some("extra".into()),
            group: Some("xorg-apps".into()),
            ..PackageFilter::default()
        }
        .with_search("TERMINAL");
        assert!(filter.matches(&pkg, InstallReason::NotInstalled, false));

        filter.group = Some("xorg".into());
        assert!(!filter.matches(&pkg, InstallReason::NotInstalled, false));

        let filter = PackageFilter::default().with_search("wayland");
        assert!(!filter.matches(&pkg, InstallReason::NotInstalled, false));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        assert_eq!(PackageFilter::default().with_search("   ").search, None);
    }

    #[test]
    fn test_filter_tree_layout() {
        let core = Repository::new(
            "core",
            vec![
                Package::new("make", "4.4-1").with_groups(&["base-devel"]),
                Package::new("linux", "6.11-1"),
            ],
        );
        let extra = Repository::empty("extra");
        let tree = filter_tree(&[core, extra]);

        let titles: Vec<_> = tree.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "All Packages",
                "Installed",
                "Explicit",
                "Dependency",
                "Optional",
                "Orphan",
                "core",
                "extra",
                "Foreign"
            ]
        );
        let core_node = &tree[6];
        assert_eq!(core_node.children.len(), 1);
        assert_eq!(core_node.children[0].filter.group.as_deref(), Some("base-devel"));
        assert_eq!(core_node.children[0].filter.repo.as_deref(), Some("core"));
        assert!(tree[7].children.is_empty());
    }
}
