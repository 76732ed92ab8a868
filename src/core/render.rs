use crate::domain::model::{Candidate, CandidateVersion, LocalCandidate, Version};
use crate::utils::error::Result;
use serde::Serialize;

const GRID_COLUMNS: usize = 4;
const GRID_CELL: usize = 20;

/// Renders candidates in the layout of the catalog listing.
pub fn render_listing(candidates: &[Candidate], width: usize) -> String {
    let rule = "-".repeat(width);
    let mut out = String::new();

    for candidate in candidates {
        out.push_str(&rule);
        out.push('\n');

        let title = if candidate.default_version.is_empty() {
            candidate.name.clone()
        } else {
            format!("{} ({})", candidate.name, candidate.default_version)
        };
        push_spread(&mut out, &title, &candidate.homepage, width);
        out.push('\n');

        for line in wrap(&candidate.description, width) {
            out.push_str(&line);
            out.push('\n');
        }
        if candidate.is_installed() {
            let installed = candidate
                .installed_versions
                .iter()
                .map(|v| {
                    if candidate.current_version.as_deref() == Some(v.as_str()) {
                        format!("> {}", v)
                    } else {
                        v.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("(installed: {})\n", installed));
        }
        out.push('\n');

        out.push_str(&right_align(&candidate.install_command(), width));
        out.push('\n');
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

pub fn render_versions(candidate: &str, versions: &[CandidateVersion], width: usize) -> String {
    let banner = "=".repeat(width);
    let mut out = String::new();
    let java = versions.iter().any(|v| v.version.is_java());

    out.push_str(&banner);
    out.push('\n');
    out.push_str(&format!("Available {} Versions\n", title_case(candidate)));
    out.push_str(&banner);
    out.push('\n');

    if java {
        render_java_table(&mut out, versions, width);
    } else {
        render_grid(&mut out, versions);
    }

    out.push_str(&banner);
    out.push('\n');
    if java {
        out.push_str(&format!(
            "Install a specific version by Identifier:\n    $ sdk install {} <identifier>\n",
            candidate
        ));
    } else {
        out.push_str("+ - local version\n* - installed\n> - currently in use\n");
    }
    out.push_str(&banner);
    out.push('\n');
    out
}

fn render_java_table(out: &mut String, versions: &[CandidateVersion], width: usize) {
    out.push_str(&format!(
        " {:<13} | {:<3} | {:<12} | {:<7} | {:<10} | {}\n",
        "Vendor", "Use", "Version", "Dist", "Status", "Identifier"
    ));
    out.push_str(&"-".repeat(width));
    out.push('\n');

    let mut last_vendor = "";
    for entry in versions {
        if let Version::Java {
            vendor,
            version,
            distribution,
            identifier,
            ..
        } = &entry.version
        {
            let shown_vendor = if vendor.as_str() == last_vendor { "" } else { vendor.as_str() };
            last_vendor = vendor.as_str();
            let usage = if entry.current { ">>>" } else { "" };
            let status = if entry.local_only {
                "local only"
            } else if entry.installed {
                "installed"
            } else {
                ""
            };
            out.push_str(&format!(
                " {:<13} | {:<3} | {:<12} | {:<7} | {:<10} | {}\n",
                shown_vendor, usage, version, distribution, status, identifier
            ));
        }
    }
}

fn render_grid(out: &mut String, versions: &[CandidateVersion]) {
    for row in versions.chunks(GRID_COLUMNS) {
        let line: String = row
            .iter()
            .map(|v| {
                let current = if v.current { '>' } else { ' ' };
                let installed = if v.local_only {
                    '+'
                } else if v.installed {
                    '*'
                } else {
                    ' '
                };
                format!(" {} {} {:<width$}", current, installed, v.identifier(), width = GRID_CELL - 5)
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

pub fn render_installed(locals: &[LocalCandidate]) -> String {
    if locals.is_empty() {
        return "No candidates installed\n".to_string();
    }

    let name_width = locals
        .iter()
        .map(|l| l.binary_name.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for local in locals {
        let versions = local
            .versions
            .iter()
            .map(|v| {
                if v.current {
                    format!("> {}", v.identifier())
                } else {
                    v.identifier().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(&format!("{:<width$}  {}\n", local.binary_name, versions, width = name_width));
    }
    out
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn to_csv(candidates: &[Candidate]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "name",
        "binary_name",
        "default_version",
        "homepage",
        "installed",
        "description",
    ])?;
    for candidate in candidates {
        let installed = candidate.installed_versions.join(" ");
        writer.write_record([
            candidate.name.as_str(),
            candidate.binary_name.as_str(),
            candidate.default_version.as_str(),
            candidate.homepage.as_str(),
            installed.as_str(),
            candidate.description.as_str(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn push_spread(out: &mut String, left: &str, right: &str, width: usize) {
    let used = left.chars().count() + right.chars().count();
    if used < width {
        out.push_str(left);
        out.push_str(&" ".repeat(width - used));
        out.push_str(right);
        out.push('\n');
    } else {
        out.push_str(left);
        out.push('\n');
        out.push_str(&right_align(right, width));
        out.push('\n');
    }
}

fn right_align(text: &str, width: usize) -> String {
    format!("{:>width$}", text, width = width)
}

/// Greedy word wrap; words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
