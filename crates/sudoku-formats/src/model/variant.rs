//! Variant detection and canonical normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::constraints::{flag, non_empty, Constraints};

/// Which puzzle feature is active.
///
/// Used to pick the most compact valid encoding, not to judge the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Classic,
    Thermo,
    Killer,
    Arrow,
    Irregular,
    Kropki,
    Diagonal,
    AntiKnight,
    AntiKing,
    ExtraRegions,
    OddEven,
    Renban,
    Palindrome,
    TopBottom,
    Mixed,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Thermo => "thermo",
            Variant::Killer => "killer",
            Variant::Arrow => "arrow",
            Variant::Irregular => "irregular",
            Variant::Kropki => "kropki",
            Variant::Diagonal => "diagonal",
            Variant::AntiKnight => "antiknight",
            Variant::AntiKing => "antiking",
            Variant::ExtraRegions => "extraregions",
            Variant::OddEven => "oddeven",
            Variant::Renban => "renban",
            Variant::Palindrome => "palindrome",
            Variant::TopBottom => "topbottom",
            Variant::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a constraint set.
///
/// Each feature is checked independently. More than one active feature
/// yields [`Variant::Mixed`], none yields [`Variant::Classic`].
pub fn detect_variant(constraints: &Constraints) -> Variant {
    let c = constraints;
    let checks = [
        (non_empty(&c.thermos), Variant::Thermo),
        (non_empty(&c.arrows), Variant::Arrow),
        (non_empty(&c.killer_cages), Variant::Killer),
        (
            flag(c.primary_diagonal) || flag(c.secondary_diagonal),
            Variant::Diagonal,
        ),
        (flag(c.anti_knight), Variant::AntiKnight),
        (c.has_irregular_regions(), Variant::Irregular),
        (non_empty(&c.extra_regions), Variant::ExtraRegions),
        (
            non_empty(&c.odd_cells) || non_empty(&c.even_cells),
            Variant::OddEven,
        ),
        (
            non_empty(&c.kropki_dots) || flag(c.kropki_negative),
            Variant::Kropki,
        ),
        (flag(c.anti_king), Variant::AntiKing),
        (flag(c.top_bottom), Variant::TopBottom),
        (non_empty(&c.renbans), Variant::Renban),
        (non_empty(&c.palindromes), Variant::Palindrome),
    ];

    let mut active = checks.iter().filter(|(on, _)| *on).map(|(_, v)| *v);
    match (active.next(), active.next()) {
        (None, _) => Variant::Classic,
        (Some(variant), None) => variant,
        (Some(_), Some(_)) => Variant::Mixed,
    }
}

/// Drops empty, false and redundant fields.
///
/// Line-like constraints shorter than two cells and cages without cells are
/// removed, and `regions` equal to the default tiling becomes `None`.
pub fn normalize(constraints: &Constraints) -> Constraints {
    fn keep<T>(items: &Option<Vec<T>>, pred: impl Fn(&T) -> bool) -> Option<Vec<T>>
    where
        T: Clone,
    {
        let kept: Vec<T> = items.as_ref()?.iter().filter(|item| pred(item)).cloned().collect();
        if kept.is_empty() { None } else { Some(kept) }
    }
    fn keep_flag(value: Option<bool>) -> Option<bool> {
        if flag(value) { Some(true) } else { None }
    }

    let c = constraints;
    Constraints {
        grid_size: c.grid_size,
        fixed_numbers: keep(&c.fixed_numbers, |_| true),
        regions: if c.has_irregular_regions() {
            c.regions.clone()
        } else {
            None
        },
        extra_regions: keep(&c.extra_regions, |region| !region.is_empty()),
        thermos: keep(&c.thermos, |line| line.len() >= 2),
        arrows: keep(&c.arrows, |arrow| !arrow.circle_cells.is_empty()),
        killer_cages: keep(&c.killer_cages, |cage| !cage.region.is_empty()),
        kropki_dots: keep(&c.kropki_dots, |_| true),
        odd_cells: keep(&c.odd_cells, |_| true),
        even_cells: keep(&c.even_cells, |_| true),
        renbans: keep(&c.renbans, |line| line.len() >= 2),
        palindromes: keep(&c.palindromes, |line| line.len() >= 2),
        primary_diagonal: keep_flag(c.primary_diagonal),
        secondary_diagonal: keep_flag(c.secondary_diagonal),
        anti_knight: keep_flag(c.anti_knight),
        anti_king: keep_flag(c.anti_king),
        kropki_negative: keep_flag(c.kropki_negative),
        top_bottom: keep_flag(c.top_bottom),
    }
}

impl Constraints {
    /// See [`detect_variant`].
    pub fn variant(&self) -> Variant {
        detect_variant(self)
    }

    /// See [`normalize`].
    pub fn normalized(&self) -> Constraints {
        normalize(self)
    }
}
