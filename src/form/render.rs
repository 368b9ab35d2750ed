use crate::form::{
    admin_page::{AdminPage, FieldKind, FormRow},
    field_view::{Annotation, AnnotationTone},
};

// ============================================================================
// HTML renderer: form fragment as the admin page would show it
// ============================================================================

/// Render the page as an HTML `<form>` fragment.
///
/// Hidden rows carry `style="display: none"`. Annotations follow their
/// field inside the row, one element per key, lines separated by `<br>`.
pub fn render_html(page: &AdminPage) -> String {
    let mut rows = String::new();
    for row in &page.rows {
        rows.push_str(&render_row_html(row));
    }

    format!(
        "<form aria-label=\"{title}\">\n{rows}</form>\n",
        title = escape_html(&page.title),
        rows = rows,
    )
}

fn render_row_html(row: &FormRow) -> String {
    let field = &row.field;
    let style = if row.is_visible() {
        String::new()
    } else {
        " style=\"display: none\"".to_string()
    };
    let name = field
        .name
        .as_deref()
        .map(|n| format!(" name=\"{}\"", escape_html(n)))
        .unwrap_or_default();
    let value = field.value.as_deref().unwrap_or("");

    let mut out = format!(
        "<div class=\"form-row field-{class}\"{style}>\n",
        class = escape_html(field.name.as_deref().unwrap_or(&field.id)),
        style = style,
    );

    if let Some(label) = &field.label {
        out.push_str(&format!(
            "<label for=\"{}\">{}</label>\n",
            escape_html(&field.id),
            escape_html(label)
        ));
    }

    let control = match field.kind {
        FieldKind::Select => format!(
            "<select id=\"{id}\"{name}><option value=\"{value}\" selected>{value}</option></select>",
            id = escape_html(&field.id),
            name = name,
            value = escape_html(value),
        ),
        FieldKind::Textarea => format!(
            "<textarea id=\"{}\"{}>{}</textarea>",
            escape_html(&field.id),
            name,
            escape_html(value)
        ),
        FieldKind::Checkbox => format!(
            "<input type=\"checkbox\" id=\"{}\"{}{}>",
            escape_html(&field.id),
            name,
            if value.is_empty() || value == "false" { "" } else { " checked" }
        ),
        FieldKind::Input => format!(
            "<input type=\"text\" id=\"{}\"{} value=\"{}\">",
            escape_html(&field.id),
            name,
            escape_html(value)
        ),
    };
    out.push_str(&control);
    out.push('\n');

    for node in &row.annotations {
        out.push_str(&render_annotation_html(&node.key, &node.annotation));
    }

    out.push_str("</div>\n");
    out
}

fn render_annotation_html(key: &str, annotation: &Annotation) -> String {
    let body = annotation
        .lines
        .iter()
        .map(|l| escape_html(l))
        .collect::<Vec<_>>()
        .join("<br>");

    match annotation.tone {
        AnnotationTone::Info => format!("<p id=\"{}\">{}</p>\n", escape_html(key), body),
        AnnotationTone::Warning if annotation.is_empty() => {
            format!("<div id=\"{}\"></div>\n", escape_html(key))
        }
        AnnotationTone::Warning => format!(
            "<div id=\"{}\"><div style=\"color: red;\">{}</div></div>\n",
            escape_html(key),
            body
        ),
    }
}

// ============================================================================
// Console renderer
// ============================================================================

/// Format the page for terminal output.
///
/// ```text
/// === Item booking ===
/// [shown ] id_item = 42
///          item-stock-info: Stock on hand: 7
/// [hidden] id_count
/// ```
pub fn render_console(page: &AdminPage) -> String {
    let mut out = format!("=== {} ===\n", page.title);

    for row in &page.rows {
        let marker = if row.is_visible() { "shown " } else { "hidden" };
        match row.field.value.as_deref() {
            Some(v) if !v.is_empty() => {
                out.push_str(&format!("[{}] {} = {}\n", marker, row.field.id, v))
            }
            _ => out.push_str(&format!("[{}] {}\n", marker, row.field.id)),
        }

        for node in &row.annotations {
            if node.annotation.is_empty() {
                out.push_str(&format!("         {}: (empty)\n", node.key));
                continue;
            }
            for line in &node.annotation.lines {
                out.push_str(&format!("         {}: {}\n", node.key, line));
            }
        }
    }

    out
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
