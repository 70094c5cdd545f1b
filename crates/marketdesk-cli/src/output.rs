//! Plain-text rendering of backend records.

use marketdesk_core::access::Section;
use marketdesk_core::models::User;
use marketdesk_core::query::Page;
use serde_json::Value;

/// Fields tried, in order, as the label column of a list row.
const LABEL_FIELDS: [&str; 5] = ["name", "username", "accountName", "label", "email"];

fn label(row: &Value) -> String {
    LABEL_FIELDS
        .iter()
        .find_map(|field| row.get(*field).and_then(Value::as_str))
        .unwrap_or("-")
        .to_string()
}

fn id(row: &Value) -> String {
    match row.get("id") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => "-".to_string(),
    }
}

fn status(row: &Value) -> &'static str {
    match row.get("isActive").and_then(Value::as_bool) {
        Some(true) => "active",
        Some(false) => "inactive",
        None => "",
    }
}

/// `id  label  status` rows followed by the pagination footer.
pub fn render_page(page: &Page<Value>) -> String {
    if page.is_empty() {
        return "No records.".to_string();
    }

    let rows: Vec<(String, String, &str)> = page
        .data
        .iter()
        .map(|row| (id(row), label(row), status(row)))
        .collect();
    let id_width = rows.iter().map(|(id, _, _)| id.len()).max().unwrap_or(0);
    let label_width = rows.iter().map(|(_, l, _)| l.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (id, label, status) in &rows {
        let line = format!(
            "{:>id_width$}  {:<label_width$}  {}",
            id,
            label,
            status,
            id_width = id_width,
            label_width = label_width
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(&page.pagination.display());
    out
}

pub fn render_user(user: &User) -> String {
    let mut lines = vec![format!("{} ({})", user.full_name(), user.username)];
    if let Some(email) = &user.email {
        lines.push(format!("email: {}", email));
    }
    if let Some(rank) = &user.rank {
        lines.push(format!("rank: {:?}", rank));
    }
    let role = if user.is_admin {
        "platform admin"
    } else if user.is_staff {
        "staff"
    } else if user.is_company_admin() {
        "company admin"
    } else {
        "member"
    };
    lines.push(format!("role: {}", role));
    lines.join("\n")
}

pub fn render_menu(sections: &[Section]) -> String {
    if sections.is_empty() {
        return "No sections available.".to_string();
    }
    sections
        .iter()
        .map(|s| format!("{:<20}{}", s.title(), s.route()))
        .collect::<Vec<_>>()
        .join("\n")
}
