use crate::core::error;
use crate::core::store::Store;

pub struct InterestRepo<'s> {
    store: &'s Store,
}

impl<'s> InterestRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Every known interest tag, by name.
    pub fn list(&self) -> Result<Vec<String>, error::BridgeError> {
        self.store.broker().with_conn("interests.list", |conn| {
            let mut stmt = conn.prepare("SELECT name FROM interests ORDER BY name")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(names)
        })
    }
}
