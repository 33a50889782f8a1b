use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{MapInfo, TypeInfo, Typed};
use crate::ops::{Map, MapInsertError, MapKey};
use crate::reflection::impl_reflect_cast_fn;

// -----------------------------------------------------------------------------
// HashMap

impl<K, V, S> Typed for HashMap<K, V, S>
where
    K: MapKey,
    V: Reflect + Typed,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: MapKey,
    V: Reflect + Typed,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    impl_reflect_cast_fn!(Map);
}

impl<K, V, S> Map for HashMap<K, V, S>
where
    K: MapKey,
    V: Reflect + Typed,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    #[inline]
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Vec<(String, &dyn Reflect)> {
        HashMap::iter(self)
            .map(|(k, v)| (k.to_key(), v as &dyn Reflect))
            .collect()
    }

    fn insert_boxed(&mut self, key: &str, value: Box<dyn Reflect>) -> Result<(), MapInsertError> {
        let key = K::parse_key(key)?;
        let value = value.take::<V>().map_err(MapInsertError::Value)?;
        HashMap::insert(self, key, value);
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        HashMap::clear(self);
    }
}

// -----------------------------------------------------------------------------
// BTreeMap

impl<K: MapKey, V: Reflect + Typed> Typed for BTreeMap<K, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
    }
}

impl<K: MapKey, V: Reflect + Typed> Reflect for BTreeMap<K, V> {
    impl_reflect_cast_fn!(Map);
}

impl<K: MapKey, V: Reflect + Typed> Map for BTreeMap<K, V> {
    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Vec<(String, &dyn Reflect)> {
        BTreeMap::iter(self)
            .map(|(k, v)| (k.to_key(), v as &dyn Reflect))
            .collect()
    }

    fn insert_boxed(&mut self, key: &str, value: Box<dyn Reflect>) -> Result<(), MapInsertError> {
        let key = K::parse_key(key)?;
        let value = value.take::<V>().map_err(MapInsertError::Value)?;
        BTreeMap::insert(self, key, value);
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        BTreeMap::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::ScalarKind;

    #[test]
    fn hash_map_entries() {
        let mut map: HashMap<String, u8> = HashMap::new();
        map.insert_boxed("a", Box::new(1_u8)).unwrap();
        let entries = map.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[0].1.downcast_ref::<u8>(), Some(&1));
    }

    #[test]
    fn bad_key_and_value() {
        let mut map: BTreeMap<i32, bool> = BTreeMap::new();
        assert!(matches!(
            map.insert_boxed("one", Box::new(true)),
            Err(MapInsertError::Key(_))
        ));
        assert!(matches!(
            map.insert_boxed("1", Box::new(1_u8)),
            Err(MapInsertError::Value(_))
        ));
        assert!(Map::len(&map) == 0);
    }

    #[test]
    fn key_kind_in_info() {
        let info = <BTreeMap<u16, String> as Typed>::type_info().as_map().unwrap();
        assert_eq!(info.key_kind(), ScalarKind::Int { signed: false, bits: 16 });
    }
}
