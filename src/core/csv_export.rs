use crate::core::{CommentRecord, CsvPayload};
use std::borrow::Cow;

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";
pub const FILE_NAME_PREFIX: &str = "youtube_comments_";
pub const MAX_SLUG_LEN: usize = 50;

/// UTF-8 BOM so spreadsheet tools pick the right encoding.
const BOM: &str = "\u{FEFF}";

/// 將留言序列化為 CSV；沒有資料時回傳 `None`
pub fn serialize(records: &[CommentRecord], document_title: &str) -> Option<CsvPayload> {
    if records.is_empty() {
        tracing::info!("📭 No data to export to CSV");
        return None;
    }

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(CommentRecord::FIELDS.join(","));

    for record in records {
        let cells: Vec<Cow<'_, str>> = record.values().into_iter().map(escape_cell).collect();
        rows.push(cells.join(","));
    }

    let mut content = String::from(BOM);
    content.push_str(&rows.join("\n"));

    let file_name = file_name_for(document_title);
    tracing::debug!(
        "Serialized {} comments into {} bytes as {}",
        records.len(),
        content.len(),
        file_name
    );

    Some(CsvPayload {
        bytes: content.into_bytes(),
        file_name,
        mime_type: CSV_MIME_TYPE,
    })
}

/// Quote only cells containing a comma, a double quote or a newline.
pub fn escape_cell(value: &str) -> Cow<'_, str> {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

pub fn file_name_for(document_title: &str) -> String {
    format!("{}{}.csv", FILE_NAME_PREFIX, title_slug(document_title))
}

/// 非英數字元換成底線 (每個 UTF-16 單元一個)，轉小寫後取前 50 字元
pub fn title_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else {
            for _ in 0..c.len_utf16() {
                slug.push('_');
            }
        }
    }
    // 全部都是 ASCII，可直接以位元組截斷
    slug.truncate(MAX_SLUG_LEN);
    slug
}
