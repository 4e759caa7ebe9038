use crate::error::AppError;
use crate::model::{Task, TaskStatus};
use crate::stake;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// In-memory task board. Insertion order is preserved and nothing survives
/// the process; there is no persistence layer behind this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    pub tasks: Vec<Task>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The seed board the original surface starts with: two pending tasks
    /// and one completed, staking 3.5 units in total.
    pub fn sample() -> Self {
        Self {
            tasks: vec![
                Task {
                    id: "task-1".to_string(),
                    name: "Complete project documentation".to_string(),
                    description: "Write comprehensive documentation for the Web3 integration features"
                        .to_string(),
                    status: TaskStatus::Pending,
                    created_date: "2024-01-15".to_string(),
                    completed_date: None,
                    wei_value: "1000000000000000000".to_string(),
                },
                Task {
                    id: "task-2".to_string(),
                    name: "Review smart contract code".to_string(),
                    description: "Audit the task management smart contract for security vulnerabilities"
                        .to_string(),
                    status: TaskStatus::Completed,
                    created_date: "2024-01-10".to_string(),
                    completed_date: Some("2024-01-14".to_string()),
                    wei_value: "2000000000000000000".to_string(),
                },
                Task {
                    id: "task-3".to_string(),
                    name: "Deploy to testnet".to_string(),
                    description: "Deploy the application to Ethereum testnet for testing".to_string(),
                    status: TaskStatus::Pending,
                    created_date: "2024-01-12".to_string(),
                    completed_date: None,
                    wei_value: "500000000000000000".to_string(),
                },
            ],
        }
    }
}

/// Dashboard counters, derived from the board on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    /// Exact wei total; `None` when any task carries a non-numeric stake.
    pub total_stake_wei: Option<String>,
    /// Display form, e.g. "3.50 ETH" (or "NaN ETH" for a poisoned total).
    pub total_stake_formatted: String,
}

/// Appends a new pending task. All three fields must be non-empty after
/// trimming; `wei_value` gets no numeric validation beyond that, so a
/// malformed stake is stored as-is and surfaces as `NaN` downstream.
pub fn create_task(
    state: &mut BoardState,
    name: &str,
    description: &str,
    wei_value: &str,
) -> Result<Task, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("name is required"));
    }
    let description = description.trim();
    if description.is_empty() {
        return Err(AppError::invalid_input("description is required"));
    }
    let wei_value = wei_value.trim();
    if wei_value.is_empty() {
        return Err(AppError::invalid_input("wei value is required"));
    }

    let task = Task {
        id: next_task_id(state),
        name: name.to_string(),
        description: description.to_string(),
        status: TaskStatus::Pending,
        created_date: today()?,
        completed_date: None,
        wei_value: wei_value.to_string(),
    };

    tracing::debug!(task_id = %task.id, wei = %task.wei_value, "task created");
    state.tasks.push(task.clone());

    Ok(task)
}

/// Marks a task completed, stamping `completed_date` with today. An unknown
/// id is a silent no-op (`Ok(None)`); completing an already-completed task
/// refreshes its completion date rather than erroring.
pub fn complete_task(state: &mut BoardState, id: &str) -> Result<Option<Task>, AppError> {
    let Some(task) = state.tasks.iter_mut().find(|task| task.id == id) else {
        tracing::debug!(task_id = %id, "complete ignored, no such task");
        return Ok(None);
    };

    task.status = TaskStatus::Completed;
    task.completed_date = Some(today()?);
    tracing::debug!(task_id = %task.id, "task completed");

    Ok(Some(task.clone()))
}

pub fn get_task<'a>(state: &'a BoardState, id: &str) -> Option<&'a Task> {
    state.tasks.iter().find(|task| task.id == id)
}

/// Current snapshot, in insertion order.
pub fn list_tasks(state: &BoardState) -> &[Task] {
    &state.tasks
}

pub fn summary(state: &BoardState, unit: &str) -> Summary {
    let completed_tasks = state.tasks.iter().filter(|task| task.is_completed()).count();
    let total_tasks = state.tasks.len();
    let total_stake_wei = stake::sum_wei(state.tasks.iter().map(|task| task.wei_value.as_str()));
    let total_stake_formatted = match total_stake_wei.as_deref() {
        Some(total) => stake::format_wei(total, unit),
        None => format!("NaN {unit}"),
    };

    Summary {
        total_tasks,
        completed_tasks,
        pending_tasks: total_tasks - completed_tasks,
        total_stake_wei,
        total_stake_formatted,
    }
}

fn next_task_id(state: &BoardState) -> String {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    let mut id = format!("task-{nanos}");
    let mut bump = 1u32;
    while state.tasks.iter().any(|task| task.id == id) {
        id = format!("task-{nanos}-{bump}");
        bump += 1;
    }
    id
}

fn today() -> Result<String, AppError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let date = OffsetDateTime::now_utc().to_offset(offset).date();
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{BoardState, complete_task, create_task, get_task, list_tasks, summary, today};
    use crate::model::{Task, TaskStatus};

    fn board_with(tasks: Vec<Task>) -> BoardState {
        BoardState { tasks }
    }

    fn pending(id: &str, wei: &str) -> Task {
        Task {
            id: id.to_string(),
            name: format!("task {id}"),
            description: "demo".to_string(),
            status: TaskStatus::Pending,
            created_date: "2024-01-10".to_string(),
            completed_date: None,
            wei_value: wei.to_string(),
        }
    }

    #[test]
    fn create_task_appends_pending_task() {
        let mut state = BoardState::new();
        let task = create_task(&mut state, "Ship docs", "Write the docs", "1000000000000000000")
            .unwrap();

        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.tasks[0], task);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.completed_date, None);
        assert_eq!(task.created_date, today().unwrap());
        assert_eq!(task.wei_value, "1000000000000000000");
    }

    #[test]
    fn create_task_trims_fields() {
        let mut state = BoardState::new();
        let task = create_task(&mut state, "  Ship docs  ", " d ", " 100 ").unwrap();

        assert_eq!(task.name, "Ship docs");
        assert_eq!(task.description, "d");
        assert_eq!(task.wei_value, "100");
    }

    #[test]
    fn create_task_rejects_empty_fields_without_mutating() {
        let mut state = board_with(vec![pending("task-1", "100")]);
        let before = state.clone();

        for (name, description, wei) in [("", "x", "100"), ("x", "", "100"), ("x", "x", "  ")] {
            let err = create_task(&mut state, name, description, wei).unwrap_err();
            assert_eq!(err.code(), "invalid_input");
        }

        assert_eq!(state, before);
    }

    #[test]
    fn create_task_accepts_non_numeric_wei() {
        // Permissive on purpose: garbage stakes surface as NaN downstream.
        let mut state = BoardState::new();
        let task = create_task(&mut state, "odd", "odd", "lots of wei").unwrap();
        assert_eq!(task.wei_value, "lots of wei");
    }

    #[test]
    fn create_task_counts_accepted_calls_only() {
        let mut state = BoardState::new();
        create_task(&mut state, "a", "a", "1").unwrap();
        create_task(&mut state, "", "a", "1").unwrap_err();
        create_task(&mut state, "b", "b", "2").unwrap();
        create_task(&mut state, "c", "c", "  ").unwrap_err();

        assert_eq!(summary(&state, "ETH").total_tasks, 2);
    }

    #[test]
    fn create_task_generates_unique_ids() {
        let mut state = BoardState::new();
        for n in 0..10 {
            create_task(&mut state, "t", "t", &n.to_string()).unwrap();
        }

        let mut ids: Vec<_> = state.tasks.iter().map(|task| task.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn complete_task_stamps_today_once_pending() {
        let mut state = board_with(vec![pending("task-1", "100")]);

        let completed = complete_task(&mut state, "task-1").unwrap().unwrap();
        assert_eq!(completed.status, TaskStatus::Completed);
        assert_eq!(completed.completed_date, Some(today().unwrap()));
        assert_eq!(state.tasks[0].status, TaskStatus::Completed);
    }

    #[test]
    fn complete_task_on_unknown_id_changes_nothing() {
        let mut state = board_with(vec![pending("task-1", "100")]);
        let before = state.clone();

        let outcome = complete_task(&mut state, "task-404").unwrap();
        assert!(outcome.is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn complete_task_twice_keeps_counts_and_refreshes_date() {
        let mut state = board_with(vec![pending("task-1", "100")]);

        complete_task(&mut state, "task-1").unwrap();
        let again = complete_task(&mut state, "task-1").unwrap().unwrap();

        assert_eq!(again.status, TaskStatus::Completed);
        assert_eq!(again.completed_date, Some(today().unwrap()));
        let counts = summary(&state, "ETH");
        assert_eq!(counts.total_tasks, 1);
        assert_eq!(counts.completed_tasks, 1);
        assert_eq!(counts.pending_tasks, 0);
    }

    #[test]
    fn get_task_finds_by_id() {
        let state = board_with(vec![pending("task-1", "100"), pending("task-2", "200")]);
        assert_eq!(get_task(&state, "task-2").map(|t| t.id.as_str()), Some("task-2"));
        assert!(get_task(&state, "task-9").is_none());
    }

    #[test]
    fn list_tasks_preserves_insertion_order() {
        let mut state = BoardState::new();
        create_task(&mut state, "first", "d", "1").unwrap();
        create_task(&mut state, "second", "d", "2").unwrap();
        create_task(&mut state, "third", "d", "3").unwrap();

        let names: Vec<_> = list_tasks(&state).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn summary_counts_always_balance() {
        let mut state = BoardState::sample();
        let counts = summary(&state, "ETH");
        assert_eq!(counts.total_tasks, 3);
        assert_eq!(counts.completed_tasks + counts.pending_tasks, counts.total_tasks);

        complete_task(&mut state, "task-1").unwrap();
        let counts = summary(&state, "ETH");
        assert_eq!(counts.completed_tasks, 2);
        assert_eq!(counts.pending_tasks, 1);
        assert_eq!(counts.completed_tasks + counts.pending_tasks, counts.total_tasks);
    }

    #[test]
    fn summary_formats_total_stake() {
        let state = board_with(vec![
            pending("task-1", "1000000000000000000"),
            pending("task-2", "2000000000000000000"),
            pending("task-3", "500000000000000000"),
        ]);

        let counts = summary(&state, "ETH");
        assert_eq!(counts.total_stake_wei.as_deref(), Some("3500000000000000000"));
        assert_eq!(counts.total_stake_formatted, "3.50 ETH");
    }

    #[test]
    fn summary_total_is_nan_with_a_malformed_stake() {
        let state = board_with(vec![
            pending("task-1", "1000000000000000000"),
            pending("task-2", "lots of wei"),
        ]);

        let counts = summary(&state, "ETH");
        assert_eq!(counts.total_stake_wei, None);
        assert_eq!(counts.total_stake_formatted, "NaN ETH");
    }

    #[test]
    fn summary_of_empty_board_is_zero() {
        let counts = summary(&BoardState::new(), "ETH");
        assert_eq!(counts.total_tasks, 0);
        assert_eq!(counts.total_stake_formatted, "0.00 ETH");
    }

    #[test]
    fn sample_board_matches_the_seeded_surface() {
        let state = BoardState::sample();
        assert_eq!(state.tasks.len(), 3);
        assert_eq!(summary(&state, "ETH").total_stake_formatted, "3.50 ETH");
        assert!(state.tasks[1].is_completed());
        assert_eq!(state.tasks[1].completed_date.as_deref(), Some("2024-01-14"));
    }
}
