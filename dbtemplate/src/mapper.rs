//! Row mapping strategies

use std::marker::PhantomData;

use tracing::trace;

use crate::config::ColumnMatch;
use crate::error::{Error, Result};
use crate::traits::{Entity, Row};

/// Turns the row a cursor is positioned on into a value.
///
/// The iteration driver calls [`prepare`](Self::prepare) once with the
/// result set's columns, then [`map_row`](Self::map_row) once per row in
/// cursor order. Any error fails the whole call.
pub trait RowMapper<T> {
    /// Called once per result set, before the first row.
    fn prepare(&mut self, columns: &[String], matching: ColumnMatch) {
        let _ = (columns, matching);
    }

    /// Map the current row.
    fn map_row(&mut self, row: &dyn Row) -> Result<T>;
}

impl<T, M: RowMapper<T> + ?Sized> RowMapper<T> for &mut M {
    fn prepare(&mut self, columns: &[String], matching: ColumnMatch) {
        (**self).prepare(columns, matching)
    }

    fn map_row(&mut self, row: &dyn Row) -> Result<T> {
        (**self).map_row(row)
    }
}

/// A row mapper backed by a closure. Created by [`map_with`].
pub struct MapWith<F>(F);

/// Map each row with an explicit function.
///
/// # Example
///
/// ```ignore
/// use dbtemplate::{map_with, RowExt};
///
/// let users = template.execute(
///     "SELECT id, name FROM users",
///     map_with(|row| Ok(User { id: row.get("id")?, name: row.get("name")? })),
///     &[],
/// )?;
/// ```
pub fn map_with<T, F>(f: F) -> MapWith<F>
where
    F: FnMut(&dyn Row) -> Result<T>,
{
    MapWith(f)
}

impl<T, F> RowMapper<T> for MapWith<F>
where
    F: FnMut(&dyn Row) -> Result<T>,
{
    fn map_row(&mut self, row: &dyn Row) -> Result<T> {
        (self.0)(row)
    }
}

/// Column-to-field assignments for one result set and one entity type.
///
/// Each entry pairs a column index with the index of the field it fills.
/// Columns without a matching field have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPlan {
    bindings: Vec<(usize, usize)>,
}

impl ColumnPlan {
    /// Match `columns` against `fields` under the given policy.
    pub fn resolve<S: AsRef<str>>(columns: &[S], fields: &[&str], matching: ColumnMatch) -> Self {
        let bindings = columns
            .iter()
            .enumerate()
            .filter_map(|(column, name)| {
                fields
                    .iter()
                    .position(|field| matching.matches(name.as_ref(), field))
                    .map(|field| (column, field))
            })
            .collect();
        Self { bindings }
    }

    /// Plan for the columns of `row` itself.
    pub fn for_row(row: &dyn Row, fields: &[&str], matching: ColumnMatch) -> Self {
        let columns: Vec<&str> = (0..row.column_count())
            .map(|i| row.column_name(i).unwrap_or_default())
            .collect();
        Self::resolve(&columns, fields, matching)
    }

    /// `(column index, field index)` pairs in column order.
    pub fn bindings(&self) -> &[(usize, usize)] {
        &self.bindings
    }

    /// Build a default `T` and fill it from `row`.
    ///
    /// NULL columns leave their field at its default. When two columns map
    /// to the same field the later column wins.
    pub fn populate<T: Entity>(&self, row: &dyn Row) -> Result<T> {
        let mut entity = T::default();
        for &(column, field) in &self.bindings {
            let value = row.value_at(column)?;
            if value.is_null() {
                continue;
            }
            entity.set_field(field, value).map_err(|e| Error::Field {
                column: row.column_name(column).unwrap_or_default().to_string(),
                source: Box::new(e),
            })?;
        }
        Ok(entity)
    }
}

/// Populate a single row into a fresh `T` by column name.
pub fn populate_row<T: Entity>(row: &dyn Row, matching: ColumnMatch) -> Result<T> {
    ColumnPlan::for_row(row, T::fields(), matching).populate(row)
}

/// A row mapper that fills entities by column name. Created by [`populate`].
pub struct Populate<T> {
    matching: Option<ColumnMatch>,
    plan: Option<ColumnPlan>,
    _marker: PhantomData<fn() -> T>,
}

/// Map each row by constructing a default `T` and filling the fields whose
/// names match the result columns.
///
/// Columns with no matching field are ignored; fields with no matching
/// column keep their default.
pub fn populate<T: Entity>() -> Populate<T> {
    Populate {
        matching: None,
        plan: None,
        _marker: PhantomData,
    }
}

impl<T: Entity> Populate<T> {
    /// Override the template's column matching for this mapper.
    pub fn matching(mut self, matching: ColumnMatch) -> Self {
        self.matching = Some(matching);
        self
    }
}

impl<T: Entity> RowMapper<T> for Populate<T> {
    fn prepare(&mut self, columns: &[String], matching: ColumnMatch) {
        let matching = self.matching.unwrap_or(matching);
        let plan = ColumnPlan::resolve(columns, T::fields(), matching);
        trace!(
            entity = std::any::type_name::<T>(),
            matched = plan.bindings().len(),
            columns = columns.len(),
            "resolved column plan"
        );
        self.plan = Some(plan);
    }

    fn map_row(&mut self, row: &dyn Row) -> Result<T> {
        let matching = self.matching.unwrap_or_default();
        let plan = self
            .plan
            .get_or_insert_with(|| ColumnPlan::for_row(row, T::fields(), matching));
        plan.populate(row)
    }
}
