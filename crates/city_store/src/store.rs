//! In-memory city store

use crate::codec::{read_cities, write_cities};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tempfile::NamedTempFile;
use types::{City, CityId, StorageError};

/// Ordered collection of cities, in insertion/file order
///
/// Lookups scan linearly and act on the first match. Ids are not checked
/// for uniqueness.
#[derive(Debug, Clone, Default)]
pub struct CityStore {
    cities: Vec<City>,
}

impl CityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given cities in order
    pub fn from_cities(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// Load the store from a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let cities = read_cities(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), count = cities.len(), "Loaded cities from CSV");

        Ok(Self { cities })
    }

    /// Write the store to a CSV file, replacing its contents
    ///
    /// Rows go to a temporary file in the same directory which is then renamed
    /// over `path`, so readers never see a partially written file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StorageError> {
        let path = path.as_ref();
        let io_error = |source| StorageError::Io {
            path: path.display().to_string(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;

        write_cities(BufWriter::new(tmp.as_file_mut()), &self.cities)?;
        tmp.as_file().sync_all().map_err(io_error)?;
        tmp.persist(path).map_err(|e| io_error(e.error))?;
        tracing::debug!(path = %path.display(), count = self.cities.len(), "Saved cities to CSV");

        Ok(())
    }

    /// First city with the given id
    pub fn get_by_id(&self, id: CityId) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    /// Append a city to the end of the store
    pub fn add(&mut self, city: City) {
        self.cities.push(city);
    }

    /// Remove the first city with the given id, returning it
    pub fn delete_by_id(&mut self, id: CityId) -> Option<City> {
        let index = self.cities.iter().position(|c| c.id == id)?;
        Some(self.cities.remove(index))
    }

    /// Overwrite the population of the first city with the given id
    pub fn update_population_by_id(&mut self, id: CityId, population: i64) -> Option<&City> {
        let city = self.cities.iter_mut().find(|c| c.id == id)?;
        city.population = population;
        Some(&*city)
    }

    /// Cities whose region equals `region`
    pub fn filter_by_region(&self, region: &str) -> Vec<&City> {
        self.cities.iter().filter(|c| c.region == region).collect()
    }

    /// Cities whose district equals `district`
    pub fn filter_by_district(&self, district: &str) -> Vec<&City> {
        self.cities.iter().filter(|c| c.district == district).collect()
    }

    /// Cities with `min <= population <= max`
    pub fn filter_by_population_range(&self, min: i64, max: i64) -> Vec<&City> {
        self.cities
            .iter()
            .filter(|c| c.population_between(min, max))
            .collect()
    }

    /// Cities with `min <= foundation <= max`
    pub fn filter_by_foundation_range(&self, min: i64, max: i64) -> Vec<&City> {
        self.cities
            .iter()
            .filter(|c| c.founded_between(min, max))
            .collect()
    }

    /// Number of cities held
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the store holds no cities
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Cities in store order
    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    /// All cities as a slice
    pub fn cities(&self) -> &[City] {
        &self.cities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_store() -> CityStore {
        CityStore::from_cities(vec![
            City::new(1, "Adygeysk", "Adygeya", "Southern", 12248, 1969),
            City::new(2, "Maykop", "Adygeya", "Southern", 144246, 1857),
            City::new(3, "Barnaul", "Altai Krai", "Siberian", 612401, 1730),
            City::new(4, "Biysk", "Altai Krai", "Siberian", 210115, 1709),
            City::new(2, "Duplicate", "Amur", "Far Eastern", 1, 2000),
        ])
    }

    #[test]
    fn test_get_by_id_returns_first_match() {
        let store = sample_store();
        assert_eq!(store.get_by_id(2).unwrap().name, "Maykop");
        assert!(store.get_by_id(99).is_none());
    }

    #[test]
    fn test_add_appends() {
        let mut store = sample_store();
        let before = store.len();

        store.add(City::new(1, "Again", "Adygeya", "Southern", 5, 1990));

        assert_eq!(store.len(), before + 1);
        assert_eq!(store.cities().last().unwrap().name, "Again");
    }

    #[test]
    fn test_delete_existing_keeps_order() {
        let mut store = sample_store();

        let removed = store.delete_by_id(3).unwrap();

        assert_eq!(removed.name, "Barnaul");
        assert_eq!(store.len(), 4);
        let names: Vec<_> = store.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Adygeysk", "Maykop", "Biysk", "Duplicate"]);
    }

    #[test]
    fn test_delete_removes_only_first_match() {
        let mut store = sample_store();
        store.delete_by_id(2);
        assert_eq!(store.get_by_id(2).unwrap().name, "Duplicate");
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = sample_store();
        assert!(store.delete_by_id(42).is_none());
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_update_population_touches_only_target() {
        let mut store = sample_store();
        let before = store.cities().to_vec();

        let updated = store.update_population_by_id(2, 150000).unwrap();
        assert_eq!(updated.population, 150000);

        for (old, new) in before.iter().zip(store.iter()) {
            if old.name == "Maykop" {
                assert_eq!(new, &City { population: 150000, ..old.clone() });
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut store = sample_store();
        assert!(store.update_population_by_id(42, 1).is_none());
        assert_eq!(store.cities(), sample_store().cities());
    }

    #[test]
    fn test_filter_by_region_and_district() {
        let store = sample_store();

        let ids: Vec<_> = store.filter_by_region("Altai Krai").iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 4]);

        assert_eq!(store.filter_by_district("Southern").len(), 2);
        assert!(store.filter_by_district("Northwestern").is_empty());
    }

    #[test]
    fn test_range_filters_are_inclusive() {
        let store = sample_store();

        let hits = store.filter_by_population_range(12248, 210115);
        let ids: Vec<_> = hits.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);

        let hits = store.filter_by_foundation_range(1709, 1857);
        let ids: Vec<_> = hits.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);

        assert!(store.filter_by_population_range(1000, 10).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = sample_store();
        let file = NamedTempFile::new().unwrap();

        store.save(file.path()).unwrap();
        let loaded = CityStore::load(file.path()).unwrap();

        assert_eq!(loaded.cities(), store.cities());
    }

    #[test]
    fn test_save_overwrites() {
        let file = NamedTempFile::new().unwrap();
        sample_store().save(file.path()).unwrap();

        let small = CityStore::from_cities(vec![City::new(9, "Tula", "Tula", "Central", 1, 1146)]);
        small.save(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "9,Tula,Tula,Central,1,1146\n");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CityStore::load(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
