//! Portfolio content — profile, selected works, socials and project pages.
//!
//! Content is plain TOML.  A default file is embedded in the binary; a
//! different one can be supplied at runtime.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default content, compiled in.
pub const BUILTIN_CONTENT: &str = include_str!("../../assets/portfolio.toml");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("cannot read content file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid content: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub profile: Profile,
    #[serde(default)]
    pub works: Vec<WorkLink>,
    #[serde(default)]
    pub socials: Vec<Social>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    /// Paragraphs of the "more about me" section.
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One entry of the home page's "selected works" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLink {
    pub name: String,
    pub category: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub details: ProjectDetails,
    /// Image paths, site-rooted (`/images/x.png`).
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(default)]
    pub agency: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub stack: String,
    #[serde(default)]
    pub year: String,
}

impl ProjectDetails {
    /// Label/value pairs in display order.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("agency", &self.agency),
            ("job", &self.job),
            ("position", &self.position),
            ("stack", &self.stack),
            ("year", &self.year),
        ]
    }
}

impl Project {
    /// Resolve the project's images against an assets directory.
    pub fn image_paths(&self, assets: &Path) -> Vec<PathBuf> {
        self.images
            .iter()
            .map(|src| assets.join(src.trim_start_matches('/')))
            .collect()
    }
}

impl Portfolio {
    pub fn parse(s: &str) -> Result<Self, ContentError> {
        Ok(toml::from_str(s)?)
    }

    pub fn builtin() -> Result<Self, ContentError> {
        Self::parse(BUILTIN_CONTENT)
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let portfolio = Self::parse(&raw)?;
        tracing::debug!(
            path = %path.display(),
            works = portfolio.works.len(),
            projects = portfolio.projects.len(),
            "content loaded"
        );
        Ok(portfolio)
    }

    /// Exact slug lookup.  `None` is the "not found" page.
    pub fn project(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    /// For each work, whether it opens a new category group (and gets a
    /// spacer row above it).  The first work never does.
    pub fn group_breaks(&self) -> Vec<bool> {
        let mut out = Vec::with_capacity(self.works.len());
        let mut prev: Option<&str> = None;
        for work in &self.works {
            let group = category_group(&work.category);
            out.push(prev.is_some_and(|p| p != group));
            prev = Some(group);
        }
        out
    }

    /// Works whose slug has no project page.
    pub fn dangling_works(&self) -> impl Iterator<Item = &WorkLink> {
        self.works.iter().filter(|w| self.project(&w.slug).is_none())
    }
}

/// Categories that are listed together.  OS and hardware work share a block.
pub fn category_group(category: &str) -> &str {
    match category {
        "OS" | "HARDWARE" => "OS_HARDWARE",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(name: &str, category: &str) -> WorkLink {
        WorkLink {
            name: name.into(),
            category: category.into(),
            slug: name.to_lowercase(),
        }
    }

    fn portfolio_with(works: Vec<WorkLink>) -> Portfolio {
        Portfolio {
            profile: Profile {
                name: "Test".into(),
                tagline: String::new(),
                about: Vec::new(),
                email: None,
            },
            works,
            socials: Vec::new(),
            projects: Vec::new(),
        }
    }

    #[test]
    fn builtin_content_parses() {
        let p = Portfolio::builtin().unwrap();
        assert_eq!(p.profile.name, "Matthew Susko");
        assert_eq!(p.works.len(), 7);
        assert_eq!(p.socials.len(), 3);
        assert_eq!(p.projects.len(), 8);
    }

    #[test]
    fn every_builtin_work_has_a_page() {
        let p = Portfolio::builtin().unwrap();
        let dangling: Vec<_> = p.dangling_works().map(|w| w.slug.clone()).collect();
        assert!(dangling.is_empty(), "dangling works: {dangling:?}");
    }

    #[test]
    fn unknown_slug_is_none() {
        let p = Portfolio::builtin().unwrap();
        assert!(p.project("qswap").is_some());
        assert!(p.project("does-not-exist").is_none());
        assert!(p.project("hottake ").is_none());
    }

    #[test]
    fn os_and_hardware_share_a_group() {
        assert_eq!(category_group("OS"), "OS_HARDWARE");
        assert_eq!(category_group("HARDWARE"), "OS_HARDWARE");
        assert_eq!(category_group("WEB"), "WEB");
    }

    #[test]
    fn breaks_only_between_groups() {
        let p = portfolio_with(vec![
            work("A", "WEB"),
            work("B", "WEB"),
            work("C", "IOS"),
            work("D", "HARDWARE"),
            work("E", "OS"),
            work("F", "WEB"),
        ]);
        assert_eq!(p.group_breaks(), vec![false, false, true, true, false, true]);
    }

    #[test]
    fn details_keep_display_order() {
        let d = ProjectDetails {
            agency: "A".into(),
            job: "J".into(),
            position: "P".into(),
            stack: "S".into(),
            year: "Y".into(),
        };
        let labels: Vec<_> = d.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(labels, ["agency", "job", "position", "stack", "year"]);
    }

    #[test]
    fn image_paths_resolve_under_assets() {
        let p = Portfolio::builtin().unwrap();
        let rabbit = p.project("rabbit-r1").unwrap();
        assert_eq!(
            rabbit.image_paths(Path::new("/srv/site")),
            vec![PathBuf::from("/srv/site/images/rabbit-1.png")]
        );
    }

    #[test]
    fn missing_optional_sections_default() {
        let p = Portfolio::parse("[profile]\nname = \"Solo\"\n").unwrap();
        assert!(p.works.is_empty());
        assert!(p.projects.is_empty());
        assert!(p.profile.about.is_empty());
    }

    #[test]
    fn malformed_content_is_a_parse_error() {
        let err = Portfolio::parse("[profile\nname=").unwrap_err();
        assert!(matches!(err, ContentError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Portfolio::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }
}
