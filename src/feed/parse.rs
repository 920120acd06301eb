// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};

use crate::error::FeedError;

/// A parsed feed document
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub title: Option<String>,
    pub entries: Vec<Entry>,
}

/// A single feed entry, in document order
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub title: Option<String>,
    pub published: Option<DateTime<FixedOffset>>,
    pub links: Vec<Link>,
}

/// A link attached to an entry. RSS enclosures carry rel `enclosure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub rel: Option<String>,
    pub mime_type: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: None,
            mime_type: None,
        }
    }
}

/// Parse feed bytes, trying RSS 2.0 first and Atom second
pub fn parse_feed(xml_bytes: &[u8]) -> Result<Feed, FeedError> {
    match rss::Channel::read_from(xml_bytes) {
        Ok(channel) => Ok(feed_from_rss(&channel)),
        Err(rss_err) => match atom_syndication::Feed::read_from(xml_bytes) {
            Ok(feed) => Ok(feed_from_atom(&feed)),
            Err(atom_err) => Err(FeedError::ParseFailed {
                rss: rss_err.to_string(),
                atom: atom_err.to_string(),
            }),
        },
    }
}

fn feed_from_rss(channel: &rss::Channel) -> Feed {
    Feed {
        title: non_empty(channel.title()),
        entries: channel.items().iter().map(entry_from_rss).collect(),
    }
}

fn entry_from_rss(item: &rss::Item) -> Entry {
    let mut links = Vec::new();

    if let Some(link) = item.link().filter(|l| !l.trim().is_empty()) {
        links.push(Link {
            href: link.trim().to_string(),
            rel: Some("alternate".to_string()),
            mime_type: None,
        });
    }

    if let Some(enclosure) = item.enclosure().filter(|e| !e.url().trim().is_empty()) {
        links.push(Link {
            href: enclosure.url().trim().to_string(),
            rel: Some("enclosure".to_string()),
            mime_type: non_empty(enclosure.mime_type()),
        });
    }

    Entry {
        title: item.title().and_then(non_empty),
        published: item.pub_date().and_then(parse_date),
        links,
    }
}

fn feed_from_atom(feed: &atom_syndication::Feed) -> Feed {
    Feed {
        title: non_empty(feed.title().as_str()),
        entries: feed.entries().iter().map(entry_from_atom).collect(),
    }
}

fn entry_from_atom(entry: &atom_syndication::Entry) -> Entry {
    let links = entry
        .links()
        .iter()
        .filter(|link| !link.href().trim().is_empty())
        .map(|link| Link {
            href: link.href().trim().to_string(),
            rel: non_empty(link.rel()),
            mime_type: link.mime_type().and_then(non_empty),
        })
        .collect();

    Entry {
        title: non_empty(entry.title().as_str()),
        published: Some(entry.published().copied().unwrap_or(*entry.updated())),
        links,
    }
}

fn non_empty(s: &str) -> Option<String> {
    Some(s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse an RSS date, accepting RFC 2822 and a few common deviations
pub fn parse_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt);
    }

    let formats = [
        "%a, %d %b %Y %H:%M:%S %z",
        "%d %b %Y %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S %z",
    ];

    formats
        .iter()
        .find_map(|format| DateTime::parse_from_str(date_str, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>My Show</title>
    <description>A test podcast</description>
    <link>https://example.com</link>
    <item>
      <title>Ep 1: Intro!</title>
      <link>https://example.com/episodes/1</link>
      <pubDate>Fri, 05 Mar 2021 10:00:00 +0000</pubDate>
      <enclosure url="https://example.com/audio/ep1.mp3" length="2048" type="audio/mpeg"/>
    </item>
    <item>
      <title>Ep 2</title>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    const SAMPLE_ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Show</title>
  <id>urn:uuid:feed</id>
  <updated>2021-03-06T00:00:00Z</updated>
  <entry>
    <title>First</title>
    <id>urn:uuid:1</id>
    <updated>2021-03-06T00:00:00Z</updated>
    <published>2021-03-05T08:30:00+01:00</published>
    <link href="https://example.com/1"/>
    <link rel="enclosure" type="audio/mpeg" href="https://example.com/1.mp3"/>
  </entry>
  <entry>
    <title>Second</title>
    <id>urn:uuid:2</id>
    <updated>2021-03-07T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn parse_rss_extracts_feed_title_and_entries() {
        let feed = parse_feed(SAMPLE_RSS.as_bytes()).unwrap();

        assert_eq!(feed.title.as_deref(), Some("My Show"));
        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].title.as_deref(), Some("Ep 1: Intro!"));
    }

    #[test]
    fn parse_rss_collects_item_link_then_enclosure() {
        let feed = parse_feed(SAMPLE_RSS.as_bytes()).unwrap();
        let links = &feed.entries[0].links;

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "https://example.com/episodes/1");
        assert_eq!(links[1].href, "https://example.com/audio/ep1.mp3");
        assert_eq!(links[1].rel.as_deref(), Some("enclosure"));
        assert_eq!(links[1].mime_type.as_deref(), Some("audio/mpeg"));
    }

    #[test]
    fn parse_rss_keeps_entries_with_missing_fields() {
        let feed = parse_feed(SAMPLE_RSS.as_bytes()).unwrap();
        let entry = &feed.entries[1];

        assert!(entry.published.is_none());
        assert!(entry.links.is_empty());
    }

    #[test]
    fn parse_atom_when_rss_fails() {
        let feed = parse_feed(SAMPLE_ATOM.as_bytes()).unwrap();

        assert_eq!(feed.title.as_deref(), Some("Atom Show"));
        assert_eq!(feed.entries.len(), 2);

        let first = &feed.entries[0];
        assert_eq!(first.links.len(), 2);
        assert_eq!(first.links[1].href, "https://example.com/1.mp3");
        assert_eq!(first.published.unwrap().day(), 5);
    }

    #[test]
    fn parse_atom_falls_back_to_updated() {
        let feed = parse_feed(SAMPLE_ATOM.as_bytes()).unwrap();
        assert_eq!(feed.entries[1].published.unwrap().day(), 7);
    }

    #[test]
    fn parse_rejects_garbage() {
        let result = parse_feed(b"this is not xml");
        assert!(matches!(result, Err(FeedError::ParseFailed { .. })));
    }

    #[test]
    fn parse_date_accepts_rfc2822_and_rfc3339() {
        assert!(parse_date("Fri, 05 Mar 2021 10:00:00 +0000").is_some());
        assert!(parse_date("2021-03-05T10:00:00+00:00").is_some());
        assert!(parse_date("2021-03-05 10:00:00 +0000").is_some());
        assert!(parse_date("yesterday").is_none());
    }
}
