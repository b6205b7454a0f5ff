//! Readings that do not depend on a usable model answer.
//!
//! Both constructors here only read the catalog and build literals, so they
//! cannot fail.

use catalog::{Catalog, ResultRecord, SignRecord, TasteTwin};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::reply::OracleReply;

/// Tags attached when the generative call failed outright
pub const FALLBACK_TAGS: [&str; 3] = ["Fated", "Cosmic Interference", "Meant To Be"];

/// Tags attached when the model named a sign that does not exist
pub const ORACLE_CHOICE_TAGS: [&str; 3] = ["AI-Generated", "Eclectic", "Dynamic"];

const FALLBACK_PROPHECY: &str = "The cosmic signal flickered, but the stars still found you. \
     Your tastes drift between worlds, and fate has chosen this sign to hold them.";
const FALLBACK_SYMBOLISM: &str = "When the Oracle's vision is clouded, the universe picks for \
     you. This sign is a reminder that the best discoveries are the accidental ones.";

fn glitch_twin() -> TasteTwin {
    TasteTwin::new(
        "The Glitch",
        "📡",
        "They arrived through a crackle of static and never left. Half signal, half noise, \
         they love whatever the algorithm forgot to recommend.",
    )
}

fn oracle_choice_twin() -> TasteTwin {
    TasteTwin::new(
        "Oracle's Choice",
        "🔮",
        "The Oracle saw a sign that isn't written in any star chart, so it chose a \
         companion for you instead. They thrive in the spaces between categories.",
    )
}

/// Pick one sign uniformly at random.
///
/// A loaded `Catalog` is never empty, so the first sign is only a formality.
pub fn pick_random_sign<'a, R>(catalog: &'a Catalog, rng: &mut R) -> &'a SignRecord
where
    R: Rng + ?Sized,
{
    catalog
        .signs()
        .choose(rng)
        .unwrap_or_else(|| &catalog.signs()[0])
}

/// Full fallback used when generation fails: random sign, fixed narrative.
pub fn fallback_reading<R>(catalog: &Catalog, rng: &mut R) -> ResultRecord
where
    R: Rng + ?Sized,
{
    let sign = pick_random_sign(catalog, rng);
    ResultRecord::from_sign(
        sign,
        FALLBACK_PROPHECY,
        FALLBACK_SYMBOLISM,
        FALLBACK_TAGS.iter().map(|t| t.to_string()).collect(),
        glitch_twin(),
    )
}

/// Reading for a name-resolution miss: random sign, but the model's own
/// prophecy and symbolism are kept.
pub fn oracle_choice_reading<R>(catalog: &Catalog, reply: OracleReply, rng: &mut R) -> ResultRecord
where
    R: Rng + ?Sized,
{
    let sign = pick_random_sign(catalog, rng);
    ResultRecord::from_sign(
        sign,
        reply.prophecy,
        reply.symbolism,
        ORACLE_CHOICE_TAGS.iter().map(|t| t.to_string()).collect(),
        oracle_choice_twin(),
    )
}
