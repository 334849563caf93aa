//! Speech-level views: the list of speeches and per-monarch and per-decade
//! roll-ups derived from it.

use std::collections::BTreeMap;

use crate::dataset::{Dataset, count};
use crate::decade::Decade;
use crate::error::QueryResult;

use super::reports::{DecadeStats, MonarchStats, Speech};

/// Number of speeches in the dataset.
pub fn total_speeches(dataset: &Dataset) -> QueryResult<u64> {
    let total = dataset.with_conn(|conn| {
        conn.prepare_cached("SELECT COUNT(*) FROM speech")?
            .query_row([], |row| row.get::<_, i64>(0))
    })?;
    Ok(count(total))
}

/// Every speech, oldest first, with its total word count.
///
/// Stopwords count toward the length. A speech with no counted words
/// reports 0.
#[tracing::instrument(skip(dataset))]
pub fn all_speeches(dataset: &Dataset) -> QueryResult<Vec<Speech>> {
    let speeches = dataset.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(
            "SELECT s.year, s.monarch, COALESCE(SUM(w.count), 0)
             FROM speech s
             LEFT JOIN word_count w ON w.year = s.year
             GROUP BY s.year, s.monarch
             ORDER BY s.year",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Speech {
                year: row.get(0)?,
                monarch: row.get(1)?,
                word_count: count(row.get(2)?),
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
    })?;
    tracing::debug!(speeches = speeches.len(), "speeches loaded");
    Ok(speeches)
}

fn mean_words<'a>(speeches: impl IntoIterator<Item = &'a Speech>) -> f64 {
    let (n, sum) = speeches
        .into_iter()
        .fold((0_u64, 0_u64), |(n, sum), s| (n + 1, sum + s.word_count));
    if n == 0 { 0.0 } else { sum as f64 / n as f64 }
}

/// Per-monarch roll-up, in order of each monarch's first speech.
pub fn monarch_stats(speeches: &[Speech]) -> Vec<MonarchStats> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<&Speech>> = BTreeMap::new();
    for speech in speeches {
        let group = groups.entry(speech.monarch.as_str()).or_default();
        if group.is_empty() {
            order.push(&speech.monarch);
        }
        group.push(speech);
    }

    let mut stats: Vec<MonarchStats> = order
        .into_iter()
        .filter_map(|monarch| {
            let group = groups.get(monarch)?;
            let first_year = group.iter().map(|s| s.year).min()?;
            let last_year = group.iter().map(|s| s.year).max()?;
            Some(MonarchStats {
                monarch: monarch.to_string(),
                speech_count: group.len(),
                first_year,
                last_year,
                average_words: mean_words(group.iter().copied()),
            })
        })
        .collect();
    stats.sort_by_key(|m| m.first_year);
    stats
}

/// Per-decade roll-up, oldest decade first. Decades without speeches are
/// omitted.
pub fn decade_stats(speeches: &[Speech]) -> Vec<DecadeStats> {
    let mut groups: BTreeMap<Decade, Vec<&Speech>> = BTreeMap::new();
    for speech in speeches {
        groups.entry(Decade::of(speech.year)).or_default().push(speech);
    }

    groups
        .into_iter()
        .map(|(decade, mut group)| {
            group.sort_by_key(|s| s.year);
            let mut monarchs: Vec<String> = Vec::new();
            for speech in &group {
                if !monarchs.contains(&speech.monarch) {
                    monarchs.push(speech.monarch.clone());
                }
            }
            DecadeStats {
                decade,
                label: decade.label(),
                monarchs,
                speech_count: group.len(),
                average_words: mean_words(group.iter().copied()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    #[test]
    fn counts_speeches() {
        assert_eq!(total_speeches(&fixture::dataset()).unwrap(), 10);
        assert_eq!(total_speeches(&fixture::empty_dataset()).unwrap(), 0);
    }

    #[test]
    fn speeches_carry_word_counts() {
        let speeches = all_speeches(&fixture::dataset()).unwrap();
        let lengths: Vec<u64> = speeches.iter().map(|s| s.word_count).collect();
        assert_eq!(lengths, [15, 17, 14, 46, 13, 25, 18, 10, 17, 25]);
        assert_eq!(speeches[3].year, 1987);
        assert_eq!(speeches[3].monarch, "Margrethe II");
    }

    #[test]
    fn monarchs_in_reign_order() {
        let speeches = all_speeches(&fixture::dataset()).unwrap();
        let stats = monarch_stats(&speeches);
        let names: Vec<&str> = stats.iter().map(|m| m.monarch.as_str()).collect();
        assert_eq!(names, ["Frederik IX", "Margrethe II", "Frederik X"]);

        let margrethe = &stats[1];
        assert_eq!(margrethe.speech_count, 6);
        assert_eq!((margrethe.first_year, margrethe.last_year), (1987, 2023));
        assert!((margrethe.average_words - 21.5).abs() < 1e-9);

        let frederik_ix = &stats[0];
        assert!((frederik_ix.average_words - 46.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn decades_group_by_floor() {
        let speeches = all_speeches(&fixture::dataset()).unwrap();
        let stats = decade_stats(&speeches);
        let labels: Vec<&str> = stats.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["1960s", "1970s", "1980s", "1990s", "2020s"]);

        let twenties = &stats[4];
        assert_eq!(twenties.speech_count, 5);
        assert_eq!(twenties.monarchs, ["Margrethe II", "Frederik X"]);
        assert!((twenties.average_words - 19.0).abs() < 1e-9);

        assert!((stats[1].average_words - 15.5).abs() < 1e-9);
        assert_eq!(stats[1].decade, Decade::of(1970));
    }

    #[test]
    fn empty_input_rolls_up_to_nothing() {
        assert!(monarch_stats(&[]).is_empty());
        assert!(decade_stats(&[]).is_empty());
    }
}
