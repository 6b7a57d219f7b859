//! Extraction of news items from raw feed bytes.
//!
//! A streaming quick-xml event loop collects every `<item>` container and
//! reads the standard syndication sub-fields (`title`, `link`, `pubDate`,
//! `description`) from its direct children. Each sub-field is independently
//! optional: a missing title or date becomes a null in the output, never a
//! failure. Only structurally broken XML is an error, and the fetch unit
//! treats that the same as a failed request.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::models::{FeedDescriptor, NewsItem};

/// Parse raw response bytes into the items they contain, stamped with the
/// feed's source metadata.
///
/// Returns an empty vector when the document has no `<item>` elements; the
/// caller decides whether that is worth a warning.
pub fn parse_items(bytes: &[u8], feed: &FeedDescriptor) -> Result<Vec<NewsItem>> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut title: Option<String> = None;
    let mut link: Option<String> = None;
    let mut pub_date: Option<String> = None;
    let mut description: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" {
                    in_item = true;
                    title = None;
                    link = None;
                    pub_date = None;
                    description = None;
                } else {
                    current_tag = name;
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" && in_item {
                    in_item = false;
                    items.push(NewsItem::new(
                        feed,
                        title.take(),
                        link.take(),
                        pub_date.take(),
                        description.take(),
                    ));
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().map(|t| t.into_owned()).unwrap_or_default();
                    capture_field(
                        &current_tag,
                        text,
                        &mut title,
                        &mut link,
                        &mut pub_date,
                        &mut description,
                    );
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    capture_field(
                        &current_tag,
                        text,
                        &mut title,
                        &mut link,
                        &mut pub_date,
                        &mut description,
                    );
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Parse(e.to_string())),
            _ => {}
        }
    }

    Ok(items)
}

fn capture_field(
    tag: &str,
    text: String,
    title: &mut Option<String>,
    link: &mut Option<String>,
    pub_date: &mut Option<String>,
    description: &mut Option<String>,
) {
    match tag {
        "title" => *title = Some(text),
        "link" => *link = Some(text),
        "pubDate" => *pub_date = Some(text),
        "description" => *description = Some(text),
        _ => {}
    }
}
