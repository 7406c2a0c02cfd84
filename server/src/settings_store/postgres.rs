use super::{schema, SettingsStore, SettingsStoreFacade, StoreError};
use diesel::pg::PgConnection;
use diesel::prelude::*;

#[derive(Clone)]
pub struct PgSettingsStore {
    pool: diesel::r2d2::Pool<diesel::r2d2::ConnectionManager<PgConnection>>,
}

impl PgSettingsStore {
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        let connection_manager = diesel::r2d2::ConnectionManager::<PgConnection>::new(database_url);
        Ok(Self {
            pool: diesel::r2d2::Pool::builder()
                .test_on_check_out(true)
                .min_idle(Some(2))
                .build(connection_manager)?,
        })
    }
}

impl SettingsStore for PgSettingsStore {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn SettingsStoreFacade + 'a>, StoreError> {
        Ok(Box::new(PgSettingsStoreFacade::with_pooled_connection(
            self.pool.get()?,
        )))
    }
}

pub struct PgSettingsStoreFacade {
    connection: diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>,
}

impl PgSettingsStoreFacade {
    pub fn with_pooled_connection(
        connection: diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>,
    ) -> Self {
        Self { connection }
    }
}

/// Insert or replace a single setting row, using the given connection.
fn upsert_setting(
    the_module_id: &str,
    setting_name: &str,
    setting_value: &str,
    connection: &mut PgConnection,
) -> Result<(), StoreError> {
    use schema::settings::dsl::*;

    diesel::insert_into(settings)
        .values((
            module_id.eq(the_module_id),
            name.eq(setting_name),
            value.eq(Some(setting_value)),
        ))
        .on_conflict((module_id, name))
        .do_update()
        .set(value.eq(Some(setting_value)))
        .execute(connection)?;
    Ok(())
}

impl SettingsStoreFacade for PgSettingsStoreFacade {
    fn get_setting(
        &mut self,
        the_module_id: &str,
        setting_name: &str,
    ) -> Result<Option<String>, StoreError> {
        use schema::settings::dsl::*;

        Ok(settings
            .filter(module_id.eq(the_module_id))
            .filter(name.eq(setting_name))
            .select(value)
            .first::<Option<String>>(&mut self.connection)
            .optional()?
            .flatten())
    }

    fn get_settings(&mut self, the_module_id: &str) -> Result<Vec<(String, String)>, StoreError> {
        use schema::settings::dsl::*;

        Ok(settings
            .filter(module_id.eq(the_module_id))
            .order_by(name.asc())
            .select((name, value))
            .load::<(String, Option<String>)>(&mut self.connection)?
            .into_iter()
            .map(|(setting_name, setting_value)| (setting_name, setting_value.unwrap_or_default()))
            .collect())
    }

    fn set_settings(
        &mut self,
        the_module_id: &str,
        values: &[(&str, String)],
    ) -> Result<(), StoreError> {
        self.connection.transaction(|connection| {
            for (setting_name, setting_value) in values {
                upsert_setting(the_module_id, setting_name, setting_value, connection)?;
            }
            Ok(())
        })
    }
}
