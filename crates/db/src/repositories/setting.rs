//! Settings repository.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use lariledger_core::settings::{default_settings, CoaSetting, CodeSettings, SettingName};
use lariledger_shared::AppError;

use crate::entities::coa_settings;

/// Error types for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SettingError> for AppError {
    fn from(err: SettingError) -> Self {
        match err {
            SettingError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    writer: DatabaseConnection,
    reader: DatabaseConnection,
}

impl SettingRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(writer: DatabaseConnection, reader: DatabaseConnection) -> Self {
        Self { writer, reader }
    }

    /// Lists every stored setting row, ordered by code then setting name.
    ///
    /// Rows with unrecognized setting names are skipped; writes validate
    /// names, so such rows can only come from out-of-band edits.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_all(&self) -> Result<Vec<CoaSetting>, SettingError> {
        let rows = coa_settings::Entity::find()
            .order_by_asc(coa_settings::Column::Code)
            .order_by_asc(coa_settings::Column::Setting)
            .all(&self.reader)
            .await?;

        let mut settings = Vec::with_capacity(rows.len());
        for row in rows {
            match row.setting.parse::<SettingName>() {
                Ok(setting) => settings.push(CoaSetting {
                    code: row.code,
                    setting,
                    value: row.value,
                }),
                Err(_) => debug!(code = row.code, setting = %row.setting, "skipping unknown setting row"),
            }
        }
        Ok(settings)
    }

    /// Resolves the settings for one code, filling absent rows from
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_code_settings(&self, code: i32) -> Result<CodeSettings, SettingError> {
        let mut resolved = default_settings(code);
        let rows = coa_settings::Entity::find()
            .filter(coa_settings::Column::Code.eq(code))
            .all(&self.reader)
            .await?;
        for row in rows {
            if let Ok(name) = row.setting.parse::<SettingName>() {
                resolved.apply(name, &row.value);
            }
        }
        Ok(resolved)
    }

    /// Inserts or updates one setting row.
    ///
    /// Takes effect on the next admitted transaction; already-finalized
    /// transactions are never re-validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn upsert(&self, setting: &CoaSetting) -> Result<(), SettingError> {
        let active = coa_settings::ActiveModel {
            code: Set(setting.code),
            setting: Set(setting.setting.as_str().to_string()),
            value: Set(setting.value.clone()),
        };

        coa_settings::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([coa_settings::Column::Code, coa_settings::Column::Setting])
                    .update_column(coa_settings::Column::Value)
                    .to_owned(),
            )
            .exec_without_returning(&self.writer)
            .await?;
        Ok(())
    }

    /// Deletes one setting row; the code reverts to the default for that
    /// setting. Deleting an absent row is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn delete(&self, code: i32, setting: SettingName) -> Result<(), SettingError> {
        coa_settings::Entity::delete_many()
            .filter(coa_settings::Column::Code.eq(code))
            .filter(coa_settings::Column::Setting.eq(setting.as_str()))
            .exec(&self.writer)
            .await?;
        Ok(())
    }
}
