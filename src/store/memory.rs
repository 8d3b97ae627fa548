use super::ReadingStore;
use crate::error::Result;
use crate::lease::{sort_readings, Reading};
use chrono::NaiveDate;

/// Vector-backed store
#[derive(Debug, Clone, Default)]
pub struct MemoryReadingStore {
    readings: Vec<Reading>,
    next_id: u64,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self {
            readings: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl ReadingStore for MemoryReadingStore {
    fn append(&mut self, reading_date: NaiveDate, odometer: u64) -> Result<Reading> {
        let id = self.next_id.max(1);
        self.next_id = id + 1;

        let reading = Reading::new(id, reading_date, odometer);
        self.readings.push(reading);
        Ok(reading)
    }

    fn list_all(&self) -> Result<Vec<Reading>> {
        let mut readings = self.readings.clone();
        sort_readings(&mut readings);
        Ok(readings)
    }
}
