//! The schedule grid: one work indicator per (employee, day, hour).

use rosterforge_core::model::{BoolVar, CpModel};

/// Dense arena of work indicators sized `employees × days × max_hours`.
///
/// Days may publish fewer hours than the longest day; the slots past a day's
/// hour count hold no variable.
///
/// # Example
///
/// ```
/// use rosterforge_core::CpModel;
/// use rosterforge_encoding::ScheduleGrid;
///
/// let mut model = CpModel::new("grid");
/// let grid = ScheduleGrid::new(&mut model, 2, &[3, 1]);
///
/// assert_eq!(model.num_variables(), 8);
/// assert!(grid.work(1, 0, 2).is_some());
/// assert!(grid.work(1, 1, 2).is_none());
/// assert_eq!(grid.day_works(0, 0).len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleGrid {
    employees: usize,
    day_hours: Vec<u32>,
    max_hours: usize,
    cells: Vec<Option<BoolVar>>,
}

impl ScheduleGrid {
    /// Creates the work indicators on `model`, employee by employee, day by day.
    pub fn new(model: &mut CpModel, employees: usize, day_hours: &[u32]) -> Self {
        let max_hours = day_hours.iter().copied().max().unwrap_or(0) as usize;
        let mut cells = vec![None; employees * day_hours.len() * max_hours];
        for e in 0..employees {
            for (d, &hours) in day_hours.iter().enumerate() {
                for h in 0..hours as usize {
                    let index = (e * day_hours.len() + d) * max_hours + h;
                    cells[index] = Some(model.new_bool_var(format!("work{}_{}_{}", e, d, h)));
                }
            }
        }
        Self {
            employees,
            day_hours: day_hours.to_vec(),
            max_hours,
            cells,
        }
    }

    pub fn employees(&self) -> usize {
        self.employees
    }

    pub fn day_count(&self) -> usize {
        self.day_hours.len()
    }

    /// Published hours of `day`, zero for an unknown day.
    pub fn hours(&self, day: usize) -> usize {
        self.day_hours.get(day).map_or(0, |&h| h as usize)
    }

    fn index(&self, employee: usize, day: usize, hour: usize) -> Option<usize> {
        if employee >= self.employees || day >= self.day_hours.len() || hour >= self.max_hours {
            return None;
        }
        Some((employee * self.day_hours.len() + day) * self.max_hours + hour)
    }

    /// The indicator of one slot, `None` outside the grid.
    pub fn work(&self, employee: usize, day: usize, hour: usize) -> Option<BoolVar> {
        self.index(employee, day, hour).and_then(|i| self.cells[i])
    }

    /// One employee's indicators for one day, ordered by hour.
    pub fn day_works(&self, employee: usize, day: usize) -> Vec<BoolVar> {
        (0..self.hours(day))
            .filter_map(|h| self.work(employee, day, h))
            .collect()
    }

    /// Every indicator of one employee across all days.
    pub fn employee_works(&self, employee: usize) -> Vec<BoolVar> {
        (0..self.day_count())
            .flat_map(|d| self.day_works(employee, d))
            .collect()
    }

    /// The indicators of every employee for one (day, hour) slot.
    pub fn slot_works(&self, day: usize, hour: usize) -> Vec<BoolVar> {
        (0..self.employees)
            .filter_map(|e| self.work(e, day, hour))
            .collect()
    }

    /// Every published (day, hour) slot in day-major order.
    pub fn slots(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.day_count()).flat_map(move |d| (0..self.hours(d)).map(move |h| (d, h)))
    }
}
