//! Changelog assembly
//!
//! Walks the release tags of the current branch oldest to newest, computes
//! the commits each release introduced, and renders the sections newest
//! first under a fixed document title.

use crate::conventional::{Classifier, SectionBody};
use crate::domain::Version;
use crate::error::Result;
use crate::git::Repository;
use crate::reachability::commits_in_range;
use crate::tags::{discover_releases, Release};
use crate::unreleased::{resolve_unreleased, UnreleasedOptions};
use crate::warning::ChangelogWarning;
use chrono::{Local, NaiveDate};
use git2::Oid;
use tracing::{debug, warn};

/// Top-level heading of every generated document
pub const TITLE: &str = "# Changelog\n";

/// Everything the assembler needs besides the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogOptions {
    /// Emit only the unreleased section
    pub unreleased_only: bool,
    pub unreleased: UnreleasedOptions,
    /// Date stamped on a versioned unreleased heading
    pub today: NaiveDate,
}

impl Default for ChangelogOptions {
    fn default() -> Self {
        ChangelogOptions {
            unreleased_only: false,
            unreleased: UnreleasedOptions::default(),
            today: Local::now().date_naive(),
        }
    }
}

/// What a section describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Release(Version),
    Unreleased,
}

/// One `##` section of the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub header: String,
    pub body: SectionBody,
}

impl Section {
    /// Header line followed by the rendered blocks
    pub fn render(&self) -> String {
        format!("{}\n{}", self.header, self.body.render())
    }
}

/// Assembled changelog, sections newest first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Changelog {
    pub sections: Vec<Section>,
    pub warnings: Vec<ChangelogWarning>,
}

impl Changelog {
    /// Full markdown document
    pub fn render(&self) -> String {
        std::iter::once(TITLE.to_string())
            .chain(self.sections.iter().map(Section::render))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Builds changelogs from a repository's tags and history
pub struct ChangelogGenerator<'a, R: Repository> {
    repo: &'a R,
    classifier: Classifier,
}

impl<'a, R: Repository> ChangelogGenerator<'a, R> {
    /// Generator using the built-in category rules
    pub fn new(repo: &'a R) -> Result<Self> {
        Ok(Self::with_classifier(repo, Classifier::with_default_rules()?))
    }

    pub fn with_classifier(repo: &'a R, classifier: Classifier) -> Self {
        ChangelogGenerator { repo, classifier }
    }

    /// Assemble the changelog for the current branch tip
    ///
    /// Any repository failure aborts generation; nothing partial is returned.
    pub fn generate(&self, options: &ChangelogOptions) -> Result<Changelog> {
        let tip = self.repo.head_oid()?;
        let release_set = discover_releases(self.repo, tip)?;

        let mut changelog = Changelog {
            sections: Vec::new(),
            warnings: release_set.warnings.clone(),
        };

        if !options.unreleased_only {
            let mut previous: Option<Oid> = None;
            for release in &release_set.releases {
                let section = self.release_section(release, previous)?;
                changelog.sections.insert(0, section);
                previous = Some(release.commit);
            }
        }

        let Some(latest) = release_set.latest() else {
            debug!("no release tags on branch, skipping unreleased section");
            return Ok(changelog);
        };

        let resolution =
            resolve_unreleased(Some(&latest.tag.version), &options.unreleased, options.today)?;
        for warning in &resolution.warnings {
            warn!("{}", warning);
        }
        changelog.warnings.extend(resolution.warnings);

        let commits = commits_in_range(self.repo, Some(latest.commit), tip)?;
        let body = self.classifier.collect(&commits);
        if body.is_empty() {
            debug!(latest = %latest.tag.name, "no unreleased changes");
        } else {
            changelog.sections.insert(
                0,
                Section {
                    kind: SectionKind::Unreleased,
                    header: resolution.heading.to_string(),
                    body,
                },
            );
        }

        Ok(changelog)
    }

    /// Section for one release, covering commits since `previous`
    fn release_section(&self, release: &Release, previous: Option<Oid>) -> Result<Section> {
        let commits = commits_in_range(self.repo, previous, release.commit)?;
        let tagged = self.repo.find_commit(release.commit)?;

        debug!(
            tag = %release.tag.name,
            commits = commits.len(),
            "assembled release section"
        );

        Ok(Section {
            kind: SectionKind::Release(release.tag.version.clone()),
            header: format!(
                "## [{}] - {}",
                release.tag.version,
                tagged.release_date()
            ),
            body: self.classifier.collect(&commits),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventional::BREAKING_CHANGES;
    use crate::error::ChangelogError;
    use crate::git::mock::MockRepository;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    fn options() -> ChangelogOptions {
        ChangelogOptions {
            today: today(),
            ..ChangelogOptions::default()
        }
    }

    /// Two releases and two commits after the latest one
    fn released_history() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.commit(1, &[], "feat: initial import");
        let first = repo.commit(2, &[1], "fix: crash on start");
        repo.commit(3, &[2], "feat(cli): add --json flag");
        repo.commit(4, &[3], "chore(release): bump version");
        let second = repo.commit(5, &[4], "docs: usage");
        repo.commit(6, &[5], "fix(parser)!: handle empty input");
        repo.commit(7, &[6], "perf: cache lookups");
        repo.add_tag("v1.1.0", second);
        repo.add_tag("v1.0.0", first);
        repo
    }

    #[test]
    fn test_sections_are_newest_first() {
        let repo = released_history();
        let changelog = ChangelogGenerator::new(&repo)
            .unwrap()
            .generate(&options())
            .unwrap();

        let kinds: Vec<&SectionKind> = changelog.sections.iter().map(|s| &s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &SectionKind::Unreleased,
                &SectionKind::Release(Version::new(1, 1, 0)),
                &SectionKind::Release(Version::new(1, 0, 0)),
            ]
        );
        assert_eq!(changelog.sections[0].header, "## [unreleased]");
    }

    #[test]
    fn test_release_sections_contain_only_their_commits() {
        let repo = released_history();
        let changelog = ChangelogGenerator::new(&repo)
            .unwrap()
            .generate(&options())
            .unwrap();

        let v110 = &changelog.sections[1].body;
        assert_eq!(v110.lines("✨ Features"), ["(**cli**) Add --json flag"]);
        assert_eq!(v110.lines("📖 Documentation"), ["Usage"]);
        assert!(v110.lines("🐛 Fixes").is_empty());

        let v100 = &changelog.sections[2].body;
        assert_eq!(v100.lines("🐛 Fixes"), ["Crash on start"]);
        assert_eq!(v100.lines("✨ Features"), ["Initial import"]);

        let unreleased = &changelog.sections[0].body;
        assert_eq!(
            unreleased.lines(BREAKING_CHANGES),
            ["(**parser**) Handle empty input"]
        );
        assert_eq!(unreleased.lines("⚡️Performance"), ["Cache lookups"]);
    }

    #[test]
    fn test_render_document() {
        let mut repo = MockRepository::new();
        let first = repo.commit(1, &[], "feat: add export");
        repo.add_tag("v0.1.0", first);

        let changelog = ChangelogGenerator::new(&repo)
            .unwrap()
            .generate(&options())
            .unwrap();

        let date = repo.find_commit(first).unwrap().release_date();
        assert_eq!(
            changelog.render(),
            format!(
                "# Changelog\n\n## [0.1.0] - {}\n\n### ✨ Features\n\n- Add export\n",
                date
            )
        );
    }

    #[test]
    fn test_unreleased_only_with_minor_increment() {
        let mut repo = MockRepository::new();
        let tagged = repo.commit(1, &[], "feat: first");
        repo.commit(2, &[1], "fix: later");
        repo.add_tag("v2.3.1", tagged);

        let opts = ChangelogOptions {
            unreleased_only: true,
            unreleased: UnreleasedOptions {
                inc_minor: true,
                ..UnreleasedOptions::default()
            },
            today: today(),
        };
        let changelog = ChangelogGenerator::new(&repo)
            .unwrap()
            .generate(&opts)
            .unwrap();

        assert_eq!(changelog.sections.len(), 1);
        assert_eq!(changelog.sections[0].header, "## [2.4.0] - 2024-05-17");
        assert_eq!(
            changelog.render(),
            "# Changelog\n\n## [2.4.0] - 2024-05-17\n\n### 🐛 Fixes\n\n- Later\n"
        );
    }

    #[test]
    fn test_no_unreleased_section_when_nothing_classified() {
        let mut repo = MockRepository::new();
        let tagged = repo.commit(1, &[], "feat: first");
        repo.commit(2, &[1], "chore(release): 1.0.1");
        repo.commit(3, &[2], "Merge pull request #4");
        repo.add_tag("v1.0.0", tagged);

        let changelog = ChangelogGenerator::new(&repo)
            .unwrap()
            .generate(&options())
            .unwrap();
        assert_eq!(changelog.sections.len(), 1);
        assert!(matches!(changelog.sections[0].kind, SectionKind::Release(_)));
    }

    #[test]
    fn test_no_tags_yields_title_only() {
        let mut repo = MockRepository::new();
        repo.commit(1, &[], "feat: first");

        let opts = ChangelogOptions {
            unreleased_only: true,
            ..options()
        };
        let changelog = ChangelogGenerator::new(&repo)
            .unwrap()
            .generate(&opts)
            .unwrap();
        assert!(changelog.sections.is_empty());
        assert_eq!(changelog.render(), "# Changelog\n");
    }

    #[test]
    fn test_release_header_kept_when_range_has_no_entries() {
        let mut repo = MockRepository::new();
        let first = repo.commit(1, &[], "feat: first");
        let tagged = repo.commit(2, &[1], "chore(release): 1.0.1");
        repo.add_tag("v1.0.0", first);
        repo.add_tag("v1.0.1", tagged);

        let changelog = ChangelogGenerator::new(&repo)
            .unwrap()
            .generate(&options())
            .unwrap();
        assert_eq!(changelog.sections.len(), 2);
        assert!(changelog.sections[0].body.is_empty());
        assert!(changelog.sections[0].render().starts_with("## [1.0.1] - "));
    }

    #[test]
    fn test_diverged_tag_is_excluded_and_warned() {
        let mut repo = MockRepository::new();
        repo.commit(1, &[], "feat: root");
        let other_line = repo.commit(2, &[1], "fix: backport");
        let mainline = repo.commit(3, &[1], "feat: mainline");
        repo.add_tag("v1.0.0", other_line);
        repo.add_tag("v1.1.0", mainline);
        repo.set_head(mainline);

        let changelog = ChangelogGenerator::new(&repo)
            .unwrap()
            .generate(&options())
            .unwrap();

        assert_eq!(changelog.sections.len(), 1);
        assert_eq!(
            changelog.sections[0].kind,
            SectionKind::Release(Version::new(1, 1, 0))
        );
        assert_eq!(
            changelog.sections[0].body.lines("✨ Features"),
            ["Mainline", "Root"]
        );
        assert_eq!(
            changelog.warnings,
            vec![ChangelogWarning::TagNotAncestor {
                tag: "v1.0.0".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_explicit_tag_aborts() {
        let repo = released_history();
        let opts = ChangelogOptions {
            unreleased: UnreleasedOptions {
                tag: "next-release".to_string(),
                ..UnreleasedOptions::default()
            },
            ..options()
        };
        let result = ChangelogGenerator::new(&repo).unwrap().generate(&opts);
        assert!(matches!(result, Err(ChangelogError::Version(_))));
    }

    #[test]
    fn test_explicit_lower_tag_warns() {
        let repo = released_history();
        let opts = ChangelogOptions {
            unreleased: UnreleasedOptions {
                tag: "1.0.5".to_string(),
                ..UnreleasedOptions::default()
            },
            ..options()
        };
        let changelog = ChangelogGenerator::new(&repo)
            .unwrap()
            .generate(&opts)
            .unwrap();
        assert_eq!(changelog.sections[0].header, "## [1.0.5] - 2024-05-17");
        assert!(changelog
            .warnings
            .iter()
            .any(|w| matches!(w, ChangelogWarning::UnreleasedTagLower { .. })));
    }
}
