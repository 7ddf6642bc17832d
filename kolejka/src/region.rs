//! Voivodeship identification
//!
//! The queues API addresses Poland's sixteen voivodeships by two-digit
//! province code. Reverse geocoding hands back display names in assorted
//! casing, with or without diacritics, and sometimes with a leading
//! "województwo" qualifier, so name lookup folds all of that away before
//! matching.

use std::fmt;

/// A Polish first-level administrative region (województwo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Voivodeship {
    Dolnoslaskie,
    KujawskoPomorskie,
    Lubelskie,
    Lubuskie,
    Lodzkie,
    Malopolskie,
    Mazowieckie,
    Opolskie,
    Podkarpackie,
    Podlaskie,
    Pomorskie,
    Slaskie,
    Swietokrzyskie,
    WarminskoMazurskie,
    Wielkopolskie,
    Zachodniopomorskie,
}

impl Voivodeship {
    /// All sixteen voivodeships in province-code order.
    pub fn all() -> &'static [Voivodeship] {
        &[
            Voivodeship::Dolnoslaskie,
            Voivodeship::KujawskoPomorskie,
            Voivodeship::Lubelskie,
            Voivodeship::Lubuskie,
            Voivodeship::Lodzkie,
            Voivodeship::Malopolskie,
            Voivodeship::Mazowieckie,
            Voivodeship::Opolskie,
            Voivodeship::Podkarpackie,
            Voivodeship::Podlaskie,
            Voivodeship::Pomorskie,
            Voivodeship::Slaskie,
            Voivodeship::Swietokrzyskie,
            Voivodeship::WarminskoMazurskie,
            Voivodeship::Wielkopolskie,
            Voivodeship::Zachodniopomorskie,
        ]
    }

    /// The two-digit province code the queues API expects.
    pub fn code(&self) -> &'static str {
        match self {
            Voivodeship::Dolnoslaskie => "01",
            Voivodeship::KujawskoPomorskie => "02",
            Voivodeship::Lubelskie => "03",
            Voivodeship::Lubuskie => "04",
            Voivodeship::Lodzkie => "05",
            Voivodeship::Malopolskie => "06",
            Voivodeship::Mazowieckie => "07",
            Voivodeship::Opolskie => "08",
            Voivodeship::Podkarpackie => "09",
            Voivodeship::Podlaskie => "10",
            Voivodeship::Pomorskie => "11",
            Voivodeship::Slaskie => "12",
            Voivodeship::Swietokrzyskie => "13",
            Voivodeship::WarminskoMazurskie => "14",
            Voivodeship::Wielkopolskie => "15",
            Voivodeship::Zachodniopomorskie => "16",
        }
    }

    /// Canonical lowercase display name, diacritics included.
    pub fn display_name(&self) -> &'static str {
        match self {
            Voivodeship::Dolnoslaskie => "dolnośląskie",
            Voivodeship::KujawskoPomorskie => "kujawsko-pomorskie",
            Voivodeship::Lubelskie => "lubelskie",
            Voivodeship::Lubuskie => "lubuskie",
            Voivodeship::Lodzkie => "łódzkie",
            Voivodeship::Malopolskie => "małopolskie",
            Voivodeship::Mazowieckie => "mazowieckie",
            Voivodeship::Opolskie => "opolskie",
            Voivodeship::Podkarpackie => "podkarpackie",
            Voivodeship::Podlaskie => "podlaskie",
            Voivodeship::Pomorskie => "pomorskie",
            Voivodeship::Slaskie => "śląskie",
            Voivodeship::Swietokrzyskie => "świętokrzyskie",
            Voivodeship::WarminskoMazurskie => "warmińsko-mazurskie",
            Voivodeship::Wielkopolskie => "wielkopolskie",
            Voivodeship::Zachodniopomorskie => "zachodniopomorskie",
        }
    }

    /// Looks up a voivodeship by display name.
    ///
    /// Case- and diacritic-insensitive; a leading "województwo " qualifier
    /// is stripped before matching. Returns `None` for anything that is not
    /// one of the sixteen regions.
    pub fn from_name(name: &str) -> Option<Voivodeship> {
        let folded = fold_polish(name.trim());
        let folded = folded.strip_prefix("wojewodztwo ").unwrap_or(&folded);

        match folded {
            "dolnoslaskie" => Some(Voivodeship::Dolnoslaskie),
            "kujawsko-pomorskie" => Some(Voivodeship::KujawskoPomorskie),
            "lubelskie" => Some(Voivodeship::Lubelskie),
            "lubuskie" => Some(Voivodeship::Lubuskie),
            "lodzkie" => Some(Voivodeship::Lodzkie),
            "malopolskie" => Some(Voivodeship::Malopolskie),
            "mazowieckie" => Some(Voivodeship::Mazowieckie),
            "opolskie" => Some(Voivodeship::Opolskie),
            "podkarpackie" => Some(Voivodeship::Podkarpackie),
            "podlaskie" => Some(Voivodeship::Podlaskie),
            "pomorskie" => Some(Voivodeship::Pomorskie),
            "slaskie" => Some(Voivodeship::Slaskie),
            "swietokrzyskie" => Some(Voivodeship::Swietokrzyskie),
            "warminsko-mazurskie" => Some(Voivodeship::WarminskoMazurskie),
            "wielkopolskie" => Some(Voivodeship::Wielkopolskie),
            "zachodniopomorskie" => Some(Voivodeship::Zachodniopomorskie),
            _ => None,
        }
    }

    /// Looks up a voivodeship by its two-digit province code.
    pub fn from_code(code: &str) -> Option<Voivodeship> {
        Voivodeship::all().iter().copied().find(|v| v.code() == code)
    }
}

impl fmt::Display for Voivodeship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lowercases a name and strips the Polish diacritics that appear in
/// voivodeship names.
fn fold_polish(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            'ą' => 'a',
            'ć' => 'c',
            'ę' => 'e',
            'ł' => 'l',
            'ń' => 'n',
            'ó' => 'o',
            'ś' => 's',
            'ź' | 'ż' => 'z',
            other => other,
        })
        .collect()
}

/// The near-region working set.
///
/// Insertion-ordered and de-duplicated; the home region is refused outright
/// so it can never leak into the near-region fetch sequence. Rebuilt on
/// every successful sampling round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSet {
    home: Option<Voivodeship>,
    regions: Vec<Voivodeship>,
}

impl RegionSet {
    /// Creates an empty set that refuses `home` on insert.
    pub fn new(home: Option<Voivodeship>) -> Self {
        Self {
            home,
            regions: Vec::new(),
        }
    }

    /// Inserts a region, preserving first-seen order.
    ///
    /// Returns `false` when the region is the home region or already
    /// present.
    pub fn insert(&mut self, region: Voivodeship) -> bool {
        if Some(region) == self.home || self.regions.contains(&region) {
            return false;
        }
        self.regions.push(region);
        true
    }

    /// Regions in first-seen order.
    pub fn as_slice(&self) -> &[Voivodeship] {
        &self.regions
    }

    pub fn iter(&self) -> impl Iterator<Item = Voivodeship> + '_ {
        self.regions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lists_sixteen_regions_with_unique_codes() {
        let all = Voivodeship::all();
        assert_eq!(all.len(), 16);

        let mut codes: Vec<&str> = all.iter().map(|v| v.code()).collect();
        codes.dedup();
        assert_eq!(codes.len(), 16);
        assert_eq!(codes.first(), Some(&"01"));
        assert_eq!(codes.last(), Some(&"16"));
    }

    #[test]
    fn test_from_name_exact() {
        assert_eq!(
            Voivodeship::from_name("małopolskie"),
            Some(Voivodeship::Malopolskie)
        );
        assert_eq!(
            Voivodeship::from_name("kujawsko-pomorskie"),
            Some(Voivodeship::KujawskoPomorskie)
        );
    }

    #[test]
    fn test_from_name_folds_case_and_diacritics() {
        for name in ["Łódzkie", "ŁÓDZKIE", "lodzkie", "LODZKIE", "łódzkie"] {
            assert_eq!(
                Voivodeship::from_name(name),
                Some(Voivodeship::Lodzkie),
                "failed for {:?}",
                name
            );
        }
    }

    #[test]
    fn test_from_name_strips_wojewodztwo_prefix() {
        assert_eq!(
            Voivodeship::from_name("województwo małopolskie"),
            Some(Voivodeship::Malopolskie)
        );
        assert_eq!(
            Voivodeship::from_name("Województwo Śląskie"),
            Some(Voivodeship::Slaskie)
        );
    }

    #[test]
    fn test_from_name_rejects_unknown() {
        assert_eq!(Voivodeship::from_name("Bavaria"), None);
        assert_eq!(Voivodeship::from_name(""), None);
        assert_eq!(Voivodeship::from_name("województwo"), None);
    }

    #[test]
    fn test_every_display_name_resolves_to_itself() {
        for v in Voivodeship::all() {
            assert_eq!(Voivodeship::from_name(v.display_name()), Some(*v));
        }
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Voivodeship::from_code("06"), Some(Voivodeship::Malopolskie));
        assert_eq!(Voivodeship::from_code("16"), Some(Voivodeship::Zachodniopomorskie));
        assert_eq!(Voivodeship::from_code("17"), None);
        assert_eq!(Voivodeship::from_code("6"), None);
    }

    #[test]
    fn test_region_set_refuses_home() {
        let mut set = RegionSet::new(Some(Voivodeship::Malopolskie));
        assert!(!set.insert(Voivodeship::Malopolskie));
        assert!(set.insert(Voivodeship::Slaskie));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_region_set_deduplicates() {
        let mut set = RegionSet::new(Some(Voivodeship::Malopolskie));
        assert!(set.insert(Voivodeship::Slaskie));
        assert!(!set.insert(Voivodeship::Slaskie));
        assert!(set.insert(Voivodeship::Podkarpackie));

        assert_eq!(
            set.as_slice(),
            &[Voivodeship::Slaskie, Voivodeship::Podkarpackie]
        );
    }

    #[test]
    fn test_region_set_preserves_first_seen_order() {
        let mut set = RegionSet::new(None);
        set.insert(Voivodeship::Pomorskie);
        set.insert(Voivodeship::Lubelskie);
        set.insert(Voivodeship::Pomorskie);
        set.insert(Voivodeship::Opolskie);

        let order: Vec<Voivodeship> = set.iter().collect();
        assert_eq!(
            order,
            vec![
                Voivodeship::Pomorskie,
                Voivodeship::Lubelskie,
                Voivodeship::Opolskie
            ]
        );
    }
}
