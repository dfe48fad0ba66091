//! Conventional commit classification
//!
//! Commit titles are matched against an ordered table of [CategoryRule]s.
//! The first matching rule decides the outcome, and the table order also
//! fixes the order in which groups are rendered.

use crate::domain::CommitInfo;
use crate::error::{ChangelogError, Result};
use regex::Regex;
use tracing::debug;

/// Heading of the block that collects breaking changes
pub const BREAKING_CHANGES: &str = "💥 Breaking Changes";

/// What happens to a commit whose title matches a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// File the commit under the named group
    Group(&'static str),
    /// Drop the commit from the changelog
    Skip,
}

/// A title-prefix pattern and the action taken on a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    /// Regex source for the commit type, anchored at the start of the title
    pub prefix: &'static str,
    pub action: RuleAction,
}

impl CategoryRule {
    pub const fn group(prefix: &'static str, name: &'static str) -> Self {
        CategoryRule {
            prefix,
            action: RuleAction::Group(name),
        }
    }

    pub const fn skip(prefix: &'static str) -> Self {
        CategoryRule {
            prefix,
            action: RuleAction::Skip,
        }
    }
}

/// Built-in rule table, in matching and display order
pub const DEFAULT_RULES: &[CategoryRule] = &[
    CategoryRule::group("feat", "✨ Features"),
    CategoryRule::group("fix", "🐛 Fixes"),
    CategoryRule::group("docs", "📖 Documentation"),
    CategoryRule::group("perf", "⚡️Performance"),
    CategoryRule::group("refactor", "✏️ Refactor"),
    CategoryRule::group("revert", "↩️ Revert"),
    CategoryRule::group("style", "Styling"),
    CategoryRule::group("test", "🧪 Testing"),
    CategoryRule::group(r"build\(deps\)", "⚙️ Dependencies"),
    CategoryRule::group(r"build\(deps-dev\)", "⚙️ Dev Dependencies"),
    CategoryRule::group("build", "🛠️ Build System"),
    CategoryRule::group("ci", "🔄 Continuous Integration"),
    CategoryRule::skip(r"chore\(release\)"),
    CategoryRule::skip(r"chore\(ignore\)"),
    CategoryRule::group("chore", "Miscellaneous Tasks"),
];

/// A formatted changelog line and where it belongs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub group: &'static str,
    pub line: String,
    pub breaking: bool,
}

/// Outcome of classifying one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Entry(Entry),
    /// Matched a skip rule
    Skipped,
    /// Matched a rule but has no description text
    Empty,
    /// Not a conventional commit title
    Unmatched,
}

/// Compiled rule table
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(Regex, RuleAction)>,
}

impl Classifier {
    /// Compile a rule table
    pub fn new(rules: &[CategoryRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let pattern = format!(r"^{}(?:\((.*)\))?!?:(.+)$", rule.prefix);
                Regex::new(&pattern)
                    .map(|re| (re, rule.action))
                    .map_err(|e| {
                        ChangelogError::config(format!(
                            "Invalid category pattern '{}': {}",
                            rule.prefix, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Classifier { rules })
    }

    /// Classifier for [DEFAULT_RULES]
    pub fn with_default_rules() -> Result<Self> {
        Self::new(DEFAULT_RULES)
    }

    /// Group names in display order, without duplicates
    pub fn group_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for (_, action) in &self.rules {
            if let RuleAction::Group(name) = action {
                if !names.contains(name) {
                    names.push(*name);
                }
            }
        }
        names
    }

    /// Classify a full commit message
    pub fn classify(&self, message: &str) -> Classification {
        let title = message.split('\n').next().unwrap_or_default();
        let title = title.strip_suffix('\r').unwrap_or(title);

        let Some((captures, action)) = self
            .rules
            .iter()
            .find_map(|(re, action)| re.captures(title).map(|c| (c, *action)))
        else {
            return Classification::Unmatched;
        };

        let group = match action {
            RuleAction::Skip => return Classification::Skipped,
            RuleAction::Group(name) => name,
        };

        let scope = captures
            .get(1)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(|s| format!("(**{}**)", s.to_lowercase()));

        let description = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        let mut words: Vec<String> = description.split_whitespace().map(String::from).collect();
        let Some(first) = words.first_mut() else {
            return Classification::Empty;
        };
        *first = capitalize(first);

        let line = scope
            .into_iter()
            .chain(words)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        Classification::Entry(Entry {
            group,
            line,
            breaking: is_breaking(title, message),
        })
    }

    /// Classify a range of commits into a section body
    ///
    /// Entries keep the order of `commits` within each block.
    pub fn collect(&self, commits: &[CommitInfo]) -> SectionBody {
        let mut body = SectionBody::new(self.group_names());

        for commit in commits {
            match self.classify(&commit.message) {
                Classification::Entry(entry) => body.push(entry),
                Classification::Skipped => {
                    debug!(commit = %commit.hash, "skipping housekeeping commit")
                }
                Classification::Empty => {
                    debug!(commit = %commit.hash, "skipping commit without description")
                }
                Classification::Unmatched if commit.is_merge() => {
                    debug!(commit = %commit.hash, "skipping merge commit")
                }
                Classification::Unmatched => {}
            }
        }

        body
    }
}

/// Title marker `!:` or a breaking-change footer anywhere in the message
fn is_breaking(title: &str, message: &str) -> bool {
    let lower = message.to_lowercase();
    title.contains("!:") || lower.contains("breaking change:") || lower.contains("breaking-change:")
}

/// Upper-case the first character, leaving the rest untouched
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Classified lines of one changelog section, grouped into blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBody {
    breaking: Vec<String>,
    groups: Vec<(&'static str, Vec<String>)>,
}

impl SectionBody {
    /// Empty body with blocks in the given display order
    pub fn new(group_names: Vec<&'static str>) -> Self {
        SectionBody {
            breaking: Vec::new(),
            groups: group_names.into_iter().map(|n| (n, Vec::new())).collect(),
        }
    }

    /// File an entry under the breaking block or its group
    pub fn push(&mut self, entry: Entry) {
        if entry.breaking {
            self.breaking.push(entry.line);
            return;
        }
        match self.groups.iter_mut().find(|(name, _)| *name == entry.group) {
            Some((_, lines)) => lines.push(entry.line),
            None => self.groups.push((entry.group, vec![entry.line])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.breaking.is_empty() && self.groups.iter().all(|(_, lines)| lines.is_empty())
    }

    /// Non-empty blocks in render order, breaking changes first
    pub fn blocks(&self) -> Vec<(&str, &[String])> {
        let mut blocks: Vec<(&str, &[String])> = Vec::new();
        if !self.breaking.is_empty() {
            blocks.push((BREAKING_CHANGES, self.breaking.as_slice()));
        }
        for (name, lines) in &self.groups {
            if !lines.is_empty() {
                blocks.push((*name, lines.as_slice()));
            }
        }
        blocks
    }

    /// Lines filed under a block heading
    pub fn lines(&self, heading: &str) -> &[String] {
        if heading == BREAKING_CHANGES {
            return &self.breaking;
        }
        self.groups
            .iter()
            .find(|(name, _)| *name == heading)
            .map(|(_, lines)| lines.as_slice())
            .unwrap_or_default()
    }

    /// Markdown for the blocks: a `###` heading then one bullet per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, lines) in self.blocks() {
            out.push_str(&format!("\n### {}\n\n", name));
            for line in lines {
                out.push_str(&format!("- {}\n", line));
            }
        }
        out
    }
}
