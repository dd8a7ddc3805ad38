//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for pivot host integration tests.

use app_lib::{create_app_state, pivot, AppState, PivotViewResponse};
use pivot_engine::{Dataset, Field, Record};

/// Test harness for creating and managing test state.
pub struct TestHarness {
    pub state: AppState,
}

impl TestHarness {
    /// Create a harness over the given records.
    pub fn with_records(records: Vec<Record>) -> Self {
        TestHarness {
            state: create_app_state(Dataset::from_records(records)),
        }
    }

    /// Create a harness over the staffing fixture.
    pub fn with_staffing_data() -> Self {
        Self::with_records(StaffingFixture::records())
    }

    pub fn drop_field(&self, zone: &str, field: &str) -> Result<PivotViewResponse, String> {
        pivot::drop_field(&self.state, zone, field)
    }

    pub fn remove_field(&self, zone: &str, field: &str) -> Result<PivotViewResponse, String> {
        pivot::remove_field(&self.state, zone, field)
    }

    pub fn set_aggregation(&self, operator: &str) -> Result<PivotViewResponse, String> {
        pivot::set_aggregation(&self.state, operator)
    }

    pub fn view(&self) -> PivotViewResponse {
        pivot::get_pivot_view(&self.state).unwrap()
    }

    /// Apply drops in order, panicking on rejection.
    pub fn configure(&self, drops: &[(&str, &str)]) -> PivotViewResponse {
        let mut last = None;
        for (zone, field) in drops {
            last = Some(self.drop_field(zone, field).unwrap());
        }
        last.unwrap_or_else(|| self.view())
    }

    /// Value of `field_id` in the row whose group field `group` equals `key`.
    pub fn cell(&self, group: Field, key: &str, field_id: &str) -> Option<f64> {
        find_row_value(&self.view(), group, key, field_id)
    }
}

pub fn find_row_value(response: &PivotViewResponse, group: Field, key: &str, field_id: &str) -> Option<f64> {
    response
        .rows
        .iter()
        .find(|row| row.group_value(group).map(|v| v.display_text()) == Some(key.to_string()))
        .and_then(|row| row.value(field_id))
}

/// Small staffing dataset with known aggregates.
pub struct StaffingFixture;

impl StaffingFixture {
    /// (department, status, location, employees, carats, pcs)
    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64, f64)> {
        vec![
            ("Sales", "Active", "NY", 10.0, 20.0, 100.0),
            ("Sales", "Closed", "LA", 20.0, 10.0, 50.0),
            ("HR", "Active", "NY", 5.0, 7.0, 30.0),
            ("Sales", "Active", "LA", 7.0, 5.0, 12.0),
            ("IT", "Pending", "NY", 12.0, 40.0, 450.0),
            ("HR", "Closed", "LA", 3.0, 9.0, 10.0),
            ("IT", "Active", "SF", 30.0, 60.0, 200.0),
        ]
    }

    pub fn records() -> Vec<Record> {
        Self::data()
            .into_iter()
            .map(|(department, status, location, employees, carats, pcs)| {
                Record::new()
                    .with(Field::Department, department)
                    .with(Field::Status, status)
                    .with(Field::Location, location)
                    .with(Field::Employees, employees)
                    .with(Field::Carats, carats)
                    .with(Field::Pcs, pcs)
            })
            .collect()
    }
}
