//! Plain-text rendering of views.

use std::fmt;

use crate::collaborator::Collaborator;

use super::{Listing, Statistics, View};

/// Widest bar drawn in a chart.
const BAR_WIDTH: usize = 40;

const LIST_HEADERS: [&str; 8] = [
    "ID",
    "Full name",
    "City",
    "State",
    "Phone",
    "Role",
    "Birth date",
    "Registered at",
];

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { id } => {
                writeln!(f, "Collaborator registered successfully! ID: {id}")
            }
            Self::Rejected(errors) => {
                for error in errors {
                    writeln!(f, "error: {error}")?;
                }
                Ok(())
            }
            Self::Listing(listing) => write!(f, "{listing}"),
            Self::NoCollaborators => writeln!(f, "No collaborators registered yet."),
            Self::Deleted { id } => writeln!(f, "Collaborator {id} deleted successfully."),
            Self::DeleteFailed { id } => writeln!(f, "error: could not delete collaborator {id}"),
            Self::Statistics(stats) => write!(f, "{stats}"),
            Self::NoStatistics => writeln!(f, "No data available for statistics."),
            Self::About(content) => {
                write!(f, "{content}")?;
                if content.ends_with('\n') {
                    Ok(())
                } else {
                    writeln!(f)
                }
            }
            Self::Failure(message) => writeln!(f, "error: {message}"),
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total collaborators: {} | Search results: {}",
            self.total,
            self.matched()
        )?;
        if let Some(role) = &self.most_common_role {
            write!(f, " | Most common role: {role}")?;
        }
        writeln!(f)?;

        if !self.role_options.is_empty() {
            writeln!(f, "Roles: {}", self.role_options.join(", "))?;
        }
        writeln!(f)?;

        if self.rows.is_empty() {
            return writeln!(f, "No collaborator matches the filters.");
        }

        let rows: Vec<[String; 8]> = self.rows.iter().map(table_row).collect();
        write_table(f, &LIST_HEADERS, &rows)?;
        writeln!(f)?;
        writeln!(f, "Use `delete <ID>` to remove a collaborator.")
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total collaborators: {}", self.total)?;
        if let Some(cities) = self.distinct_cities {
            writeln!(f, "Distinct cities:     {cities}")?;
        }
        if let Some(states) = self.distinct_states {
            writeln!(f, "Distinct states:     {states}")?;
        }
        if let Some(roles) = self.distinct_roles {
            writeln!(f, "Distinct roles:      {roles}")?;
        }

        if !self.by_role.is_empty() {
            writeln!(f)?;
            writeln!(f, "Distribution by role")?;
            write_bars(f, &self.by_role)?;
        }
        if !self.by_state.is_empty() {
            writeln!(f)?;
            writeln!(f, "Distribution by state")?;
            write_bars(f, &self.by_state)?;
        }
        if !self.by_month.is_empty() {
            writeln!(f)?;
            writeln!(f, "Registrations per month")?;
            write_bars(f, &self.by_month)?;
        }
        Ok(())
    }
}

fn table_row(c: &Collaborator) -> [String; 8] {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    [
        c.id.to_string(),
        c.full_name.clone(),
        text(&c.city),
        text(&c.state_code),
        text(&c.phone),
        text(&c.role),
        c.birth_date.map(|d| d.to_string()).unwrap_or_default(),
        c.created_at.to_string(),
    ]
}

fn write_table<const N: usize>(
    f: &mut fmt::Formatter<'_>,
    headers: &[&str; N],
    rows: &[[String; N]],
) -> fmt::Result {
    let mut widths: [usize; N] = (*headers).map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
    write_table_line(f, &widths, &header)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_table_line(f, &widths, &rule)?;
    for row in rows {
        write_table_line(f, &widths, row)?;
    }
    Ok(())
}

fn write_table_line(f: &mut fmt::Formatter<'_>, widths: &[usize], cells: &[String]) -> fmt::Result {
    let line = widths
        .iter()
        .zip(cells)
        .map(|(width, cell)| pad(cell, *width))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}

/// Left-align `cell` in `width` characters.
fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}

fn write_bars(f: &mut fmt::Formatter<'_>, counts: &[(String, usize)]) -> fmt::Result {
    let label_width = counts
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let max = counts.iter().map(|(_, count)| *count).max().unwrap_or(0);

    for (label, count) in counts {
        writeln!(
            f,
            "  {}  {} {count}",
            pad(label, label_width),
            "#".repeat(bar_len(*count, max))
        )?;
    }
    Ok(())
}

/// Bar length for `count`, scaled so `max` fills [`BAR_WIDTH`].
fn bar_len(count: usize, max: usize) -> usize {
    if max == 0 || count == 0 {
        0
    } else {
        (count * BAR_WIDTH / max).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ListFilter;
    use crate::collaborator::FieldError;
    use chrono::NaiveDate;

    fn jane() -> Collaborator {
        Collaborator {
            id: 1,
            full_name: "Jane Doe".to_string(),
            address: None,
            district: None,
            city: Some("São Paulo".to_string()),
            state_code: Some("SP".to_string()),
            postal_code: Some("01310-100".to_string()),
            phone: Some("(11) 98888-7777".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1990, 2, 1),
            role: Some("Analista".to_string()),
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_render_created() {
        let out = View::Created { id: 7 }.to_string();
        assert!(out.contains("ID: 7"));
    }

    #[test]
    fn test_render_rejected_one_line_per_field() {
        let out = View::Rejected(vec![FieldError::FullNameRequired, FieldError::InvalidPhone])
            .to_string();
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("full name is required"));
        assert!(out.contains("at least 10 digits"));
    }

    #[test]
    fn test_render_listing() {
        let listing = Listing::build(&[jane()], &ListFilter::default());
        let out = View::Listing(listing).to_string();

        assert!(out.contains("Total collaborators: 1 | Search results: 1"));
        assert!(out.contains("Most common role: Analista"));
        assert!(out.contains("Full name"));
        assert!(out.contains("Jane Doe"));
        assert!(out.contains("1990-02-01"));
        assert!(out.contains("2024-05-01 12:00:00"));
        assert!(out.contains("delete <ID>"));
    }

    #[test]
    fn test_render_listing_without_matches() {
        let filter = ListFilter::new(Some("zzz".to_string()), None);
        let out = Listing::build(&[jane()], &filter).to_string();

        assert!(out.contains("Search results: 0"));
        assert!(out.contains("No collaborator matches the filters."));
        assert!(!out.contains("Full name"));
    }

    #[test]
    fn test_table_columns_align() {
        let mut other = jane();
        other.id = 10;
        other.full_name = "Bo".to_string();
        let out = Listing::build(&[other, jane()], &ListFilter::default()).to_string();

        let table: Vec<&str> = out
            .lines()
            .skip_while(|l| !l.starts_with("ID"))
            .take(4)
            .collect();
        let name_col = table[0].find("Full name").unwrap();
        assert_eq!(table[2].chars().nth(name_col), Some('B'));
        assert_eq!(table[3].chars().nth(name_col), Some('J'));
    }

    #[test]
    fn test_render_statistics() {
        let stats = Statistics::from_records(&[jane()]);
        let out = View::Statistics(stats).to_string();

        assert!(out.contains("Total collaborators: 1"));
        assert!(out.contains("Distribution by role"));
        assert!(out.contains("Distribution by state"));
        assert!(out.contains("Registrations per month"));
        assert!(out.contains("2024-05"));
        assert!(out.contains(&"#".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_bar_len() {
        assert_eq!(bar_len(0, 0), 0);
        assert_eq!(bar_len(5, 5), BAR_WIDTH);
        assert_eq!(bar_len(1, 1000), 1);
        assert_eq!(bar_len(2, 4), BAR_WIDTH / 2);
    }

    #[test]
    fn test_render_about_adds_trailing_newline() {
        assert_eq!(View::About("hello".to_string()).to_string(), "hello\n");
        assert_eq!(View::About("hello\n".to_string()).to_string(), "hello\n");
    }

    #[test]
    fn test_render_messages() {
        assert!(View::NoCollaborators.to_string().contains("No collaborators"));
        assert!(View::NoStatistics.to_string().contains("No data"));
        assert!(View::Deleted { id: 3 }.to_string().contains("3 deleted"));
        assert!(View::DeleteFailed { id: 3 }
            .to_string()
            .contains("could not delete collaborator 3"));
        assert!(View::Failure("disk full".to_string())
            .to_string()
            .starts_with("error: disk full"));
    }
}
