use analyzer_core::{AppViewModel, LinkSeverity, RecordDetailView};

pub fn status_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if view.submitting {
        lines.push("analyzing... (type 'cancel' to stop)".to_string());
    }
    if !view.reanalyzing_ids.is_empty() {
        let ids: Vec<String> = view.reanalyzing_ids.iter().map(u64::to_string).collect();
        lines.push(format!("re-analyzing: {}", ids.join(", ")));
    }
    if let Some(error) = &view.last_error {
        lines.push(format!("error: {error}"));
    }
    lines
}

pub fn table_lines(view: &AppViewModel) -> Vec<String> {
    if view.records.is_empty() {
        return vec!["no analyses yet".to_string()];
    }
    let mut lines = vec![format!(
        "{:>6}  {:<32}  {:<10}  {:>5}  {:>5}  {:>6}  {:<5}  {}",
        "id", "title", "html", "int", "ext", "broken", "login", "status"
    )];
    for row in &view.records {
        let status = if row.reanalyzing {
            "re-analyzing".to_string()
        } else {
            row.error.clone().unwrap_or_default()
        };
        lines.push(format!(
            "{:>6}  {:<32}  {:<10}  {:>5}  {:>5}  {:>6}  {:<5}  {}",
            row.id,
            truncate(&row.title, 32),
            truncate(&row.html_version, 10),
            row.internal_links,
            row.external_links,
            row.inaccessible_links,
            if row.has_login_form { "yes" } else { "no" },
            status
        ));
    }
    lines
}

pub fn detail_lines(detail: &RecordDetailView) -> Vec<String> {
    let mut lines = vec![
        format!("#{} {}", detail.id, detail.url),
        format!("title:        {}", detail.title),
        format!("html version: {}", detail.html_version),
        format!(
            "login form:   {}",
            if detail.has_login_form { "yes" } else { "no" }
        ),
        format!(
            "links:        {} internal, {} external ({} total)",
            detail.links.internal, detail.links.external, detail.links.total
        ),
        format!("analyzed:     {}", detail.updated_at),
    ];

    if detail.headings.is_empty() {
        lines.push("headings:     none found".to_string());
    } else {
        lines.push("headings:".to_string());
        lines.extend(
            detail
                .headings
                .iter()
                .map(|heading| format!("  {:<4} {}", heading.tag, heading.count)),
        );
    }

    lines.push(format!("inaccessible links ({}):", detail.inaccessible.len()));
    for link in &detail.inaccessible {
        let marker = match link.severity {
            LinkSeverity::ServerError => "!!",
            LinkSeverity::ClientError => "! ",
            LinkSeverity::NoResponse => "? ",
        };
        lines.push(format!("  {marker} {:<5} {}", link.status_label, link.url));
    }

    if detail.reanalyzing {
        lines.push("re-analysis in progress".to_string());
    }
    if let Some(error) = &detail.error {
        lines.push(format!("last re-analysis: {error}"));
    }
    lines
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('~');
    out
}
