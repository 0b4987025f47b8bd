//! Length limits for Discord replies.
//!
//! Discord rejects the whole reply when one embed field or message is too
//! long, so long lists are cut and end with an `… and N more` line.

/// Most characters Discord accepts in one embed field value.
pub const MAX_FIELD_CHARS: usize = 1024;

/// Most characters Discord accepts in one message.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Most characters Discord accepts across a whole embed.
pub const MAX_EMBED_CHARS: usize = 6000;

/// Kept free in an embed for the title, field names and footer.
const EMBED_OVERHEAD_CHARS: usize = 1000;

fn more_line(hidden: usize) -> String {
    format!("… and {hidden} more")
}

/// Joins `lines` with newlines, keeping the result within `max_chars`.
///
/// Lines that do not fit are replaced by a final `… and N more` line.
#[must_use]
pub fn join_capped(lines: &[String], max_chars: usize) -> String {
    let full = lines.join("\n");
    if full.chars().count() <= max_chars {
        return full;
    }

    // Room for the widest possible "more" line plus its newline
    let reserve = more_line(lines.len()).chars().count() + 1;
    let mut joined = String::new();
    let mut used = 0;
    let mut kept = 0;
    for line in lines {
        let separator = usize::from(kept > 0);
        let len = line.chars().count();
        if used + separator + len + reserve > max_chars {
            break;
        }
        if separator == 1 {
            joined.push('\n');
        }
        joined.push_str(line);
        used += separator + len;
        kept += 1;
    }

    if kept > 0 {
        joined.push('\n');
    }
    joined.push_str(&more_line(lines.len() - kept));
    joined
}

/// A message made of a header line followed by as many `lines` as fit.
#[must_use]
pub fn capped_message(header: &str, lines: &[String]) -> String {
    let budget = MAX_MESSAGE_CHARS.saturating_sub(header.chars().count() + 1);
    format!("{header}\n{}", join_capped(lines, budget))
}

/// Characters each of `fields` field values may use so the embed stays valid.
#[must_use]
pub fn field_budget(fields: usize) -> usize {
    ((MAX_EMBED_CHARS - EMBED_OVERHEAD_CHARS) / fields.max(1)).min(MAX_FIELD_CHARS)
}

/// Footer text when only `shown` of `total` entries made it into an embed.
#[must_use]
pub fn hidden_footer(shown: usize, total: usize) -> Option<String> {
    (total > shown).then(|| format!("{} more not shown", total - shown))
}
