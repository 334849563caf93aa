//! Small in-memory dataset shared by unit tests.
//!
//! Ten speeches by three monarchs:
//!
//! | year | monarch      | words |
//! |------|--------------|-------|
//! | 1969 | Frederik IX  | 15    |
//! | 1970 | Frederik IX  | 17    |
//! | 1971 | Frederik IX  | 14    |
//! | 1987 | Margrethe II | 46    |
//! | 1999 | Margrethe II | 13    |
//! | 2020 | Margrethe II | 25    |
//! | 2021 | Margrethe II | 18    |
//! | 2022 | Margrethe II | 10    |
//! | 2023 | Margrethe II | 17    |
//! | 2024 | Frederik X   | 25    |
//!
//! Every speech also contains the stopword "og" ten times.

use rusqlite::Connection;

use crate::dataset::{Dataset, SCHEMA};

pub(crate) const SPEECHES: &[(i32, &str)] = &[
    (1969, "Frederik IX"),
    (1970, "Frederik IX"),
    (1971, "Frederik IX"),
    (1987, "Margrethe II"),
    (1999, "Margrethe II"),
    (2020, "Margrethe II"),
    (2021, "Margrethe II"),
    (2022, "Margrethe II"),
    (2023, "Margrethe II"),
    (2024, "Frederik X"),
];

const WORDS: &[(&str, i32, i64, bool)] = &[
    ("danmark", 1969, 3, false),
    ("danmark", 1971, 2, false),
    ("danmark", 1987, 4, false),
    ("danmark", 2020, 5, false),
    ("danmark", 2024, 6, false),
    ("grønland", 1999, 1, false),
    ("grønland", 2023, 7, false),
    ("grønland", 2024, 9, false),
    ("corona", 2020, 8, false),
    ("corona", 2021, 6, false),
    ("tak", 1969, 2, false),
    ("tak", 1970, 2, false),
    ("tak", 1971, 2, false),
    ("tak", 1987, 2, false),
    ("tak", 1999, 2, false),
    ("tak", 2020, 2, false),
    ("tak", 2021, 2, false),
    ("krig", 1970, 5, false),
    ("fred", 1970, 0, false),
    ("det", 1987, 30, true),
];

const ODDS_COUNTS: &[(&str, i32, i64)] = &[
    ("grønland", 2023, 3),
    ("grønland", 2024, 4),
    ("klima", 2020, 1),
    ("klima", 2022, 2),
    ("skibet", 1987, 1),
    ("fodbold", 2021, 0),
];

const ODDS: &[(&str, f64)] = &[
    ("grønland", 2.0),
    ("klima", 1.5),
    ("skibet", 8.0),
    ("fodbold", 12.0),
    ("rumfart", 25.0),
];

const PERSONS: &[(&str, i32, i64)] = &[
    ("Margrethe", 2020, 2),
    ("Margrethe", 2021, 1),
    ("Dronning Ingrid", 1971, 4),
    ("Kronprins Frederik", 2022, 1),
];

const PLACES: &[(&str, i32, i64)] = &[
    ("København", 1969, 1),
    ("København", 2024, 2),
    ("Færøerne", 1999, 2),
    ("Aarhus", 2020, 0),
];

const COMPARISON_SQL: &str = "
INSERT INTO wlo_comparisons VALUES
    (1, 'monarch', 'Margrethe II', 'other_monarchs', 10.0, 129, 71),
    (2, 'monarch', 'Frederik IX', 'other_monarchs', 10.0, 46, 154),
    (3, 'decade', '2020s', 'other_decades', 5.0, 95, 105),
    (4, 'decade', '1970s', 'other_decades', 5.0, 31, 169);
INSERT INTO wlo_words VALUES
    (1, 'det', 2, 1.90, 30, 0, 0.2326, 0.0, 2.10),
    (1, 'corona', 1, 2.40, 14, 0, 0.1085, 0.0, 2.55),
    (1, 'grønland', 3, 0.35, 8, 9, 0.0620, 0.1268, 0.60),
    (2, 'krig', 1, 2.10, 5, 0, 0.1087, 0.0, 1.80),
    (3, 'corona', 1, 2.00, 14, 0, 0.1474, 0.0, 2.30),
    (3, 'grønland', 2, 1.10, 16, 1, 0.1684, 0.0095, 1.70),
    (4, 'krig', 1, 2.20, 5, 0, 0.1613, 0.0, 1.90);
";

/// Build the fixture connection with every table populated.
pub(crate) fn connection() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory sqlite");
    conn.execute_batch(SCHEMA).expect("schema");
    for (year, monarch) in SPEECHES {
        conn.execute(
            "INSERT INTO speech (year, monarch) VALUES (?1, ?2)",
            rusqlite::params![year, monarch],
        )
        .expect("speech");
    }
    let filler = SPEECHES.iter().map(|(year, _)| ("og", *year, 10_i64, true));
    for (word, year, count, stop) in WORDS.iter().copied().chain(filler) {
        conn.execute(
            "INSERT INTO word_count (word, year, count, is_stopword) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![word, year, count, stop],
        )
        .expect("word_count");
    }
    for (word, year, count) in ODDS_COUNTS {
        conn.execute(
            "INSERT INTO odds_count (word, year, count) VALUES (?1, ?2, ?3)",
            rusqlite::params![word, year, count],
        )
        .expect("odds_count");
    }
    for (word, odds) in ODDS {
        conn.execute(
            "INSERT INTO odds (word, odds) VALUES (?1, ?2)",
            rusqlite::params![word, odds],
        )
        .expect("odds");
    }
    for (table, rows) in [("person_count", PERSONS), ("place_count", PLACES)] {
        for (entity, year, count) in rows {
            conn.execute(
                &format!("INSERT INTO {table} (entity, year, count) VALUES (?1, ?2, ?3)"),
                rusqlite::params![entity, year, count],
            )
            .expect("entity count");
        }
    }
    conn.execute_batch(COMPARISON_SQL).expect("comparisons");
    conn
}

/// The populated fixture as a read-only [`Dataset`].
pub(crate) fn dataset() -> Dataset {
    Dataset::from_connection(connection()).expect("fixture dataset")
}

/// A dataset with the schema but no rows.
pub(crate) fn empty_dataset() -> Dataset {
    let conn = Connection::open_in_memory().expect("in-memory sqlite");
    conn.execute_batch(SCHEMA).expect("schema");
    Dataset::from_connection(conn).expect("empty dataset")
}
