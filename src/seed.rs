use std::sync::LazyLock;

pub const WORDS_OF_THE_DAY: [&str; 10] = [
    "ephemeral",
    "sonder",
    "petrichor",
    "serendipity",
    "eloquence",
    "limerence",
    "ineffable",
    "hiraeth",
    "mellifluous",
    "nefelibata",
];

/// Picked once per process and read-only afterwards.
static WORD_OF_THE_DAY: LazyLock<&'static str> =
    LazyLock::new(|| WORDS_OF_THE_DAY[fastrand::usize(..WORDS_OF_THE_DAY.len())]);

pub fn word_of_the_day() -> &'static str {
    *WORD_OF_THE_DAY
}
