//! Minimal case-insensitive scanning over tabular HTML.
//!
//! Enough to walk `<table>`, `<tr>` and `<td>` blocks on pages whose layout
//! is known. Not a general HTML parser: nested blocks of the same tag are not
//! balanced.

/// Find the next `<tag ...>...</tag>` block at or after byte `from`.
///
/// Returns the byte range of the whole block, open tag included.
pub fn next_block(doc: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let lower = doc.to_ascii_lowercase();
    let open = format!("<{}", tag.to_ascii_lowercase());
    let close = format!("</{}>", tag.to_ascii_lowercase());

    let mut search = from;
    let start = loop {
        let at = lower.get(search..)?.find(&open)? + search;
        // Reject prefixes such as `<tr` matching `<track`.
        match lower.as_bytes().get(at + open.len()) {
            Some(b) if b.is_ascii_alphanumeric() => search = at + open.len(),
            _ => break at,
        }
    };
    let end = lower[start..].find(&close)? + start + close.len();
    Some((start, end))
}

/// Every `<tag>` block inside `doc`, in document order.
pub fn blocks<'a>(doc: &'a str, tag: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some((s, e)) = next_block(doc, tag, pos) {
        out.push(&doc[s..e]);
        pos = e;
    }
    out
}

/// The opening tag of `block`, lowercased, e.g. `<tr class="t_tr1">`.
pub fn open_tag(block: &str) -> String {
    let end = block.find('>').map_or(block.len(), |i| i + 1);
    block[..end].to_ascii_lowercase()
}

/// True when the opening tag of `block` carries `attr="value"` (either
/// quote style, or `value` among several classes).
pub fn has_attr(block: &str, attr: &str, value: &str) -> bool {
    let tag = open_tag(block);
    let value = value.to_ascii_lowercase();
    for quote in ['"', '\''] {
        let prefix = format!("{attr}={quote}");
        if let Some(i) = tag.find(&prefix) {
            let rest = &tag[i + prefix.len()..];
            let list = rest.split(quote).next().unwrap_or("");
            if list.split_whitespace().any(|v| v == value) {
                return true;
            }
        }
    }
    false
}

/// Text content of a block with all tags removed and whitespace collapsed.
pub fn text(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut in_tag = false;
    for ch in block.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_blocks_case_insensitively() {
        let doc = "<TABLE id=x><TR><td>1</td><TD>2</TD></TR></TABLE>";
        let rows = blocks(doc, "tr");
        assert_eq!(rows.len(), 1);
        let cells = blocks(rows[0], "td");
        assert_eq!(cells.len(), 2);
        assert_eq!(text(cells[1]), "2");
    }

    #[test]
    fn tag_prefix_not_confused() {
        let doc = "<track src=a></track><tr><td>x</td></tr>";
        let (s, _) = next_block(doc, "tr", 0).unwrap();
        assert!(doc[s..].starts_with("<tr>"));
    }

    #[test]
    fn attribute_matching() {
        assert!(has_attr(r#"<tr class="t_tr1">"#, "class", "t_tr1"));
        assert!(has_attr("<tr class='odd t_tr1'>", "class", "t_tr1"));
        assert!(!has_attr(r#"<tr class="t_tr10">"#, "class", "t_tr1"));
        assert!(has_attr(r#"<table ID="tdata">"#, "id", "tdata"));
    }

    #[test]
    fn text_strips_tags_and_entities() {
        assert_eq!(text("<td> <div class=b>5</div>&nbsp;<i>0</i>\n8 </td>"), "5 0 8");
    }
}
