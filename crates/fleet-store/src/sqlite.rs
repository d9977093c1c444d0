//! SQLite backend.
//!
//! Two tables, `robots` and `tasks`.  A single connection sits behind a
//! mutex; every [`FleetStore::with_session`] call locks it and opens one
//! transaction, so sessions from the engine thread and from API callers are
//! serialised and never interleave inside a transaction.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use fleet_core::model::FULL_BATTERY;
use fleet_core::{
    FleetError, NewRobot, NewTask, Point, Robot, RobotId, Task, TaskId, now_unix_millis,
};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params, params_from_iter};

use crate::{FleetStore, Session, StoreError, StoreResult, TaskFilter};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS robots (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        name         TEXT    NOT NULL UNIQUE,
        start_x      REAL    NOT NULL,
        start_y      REAL    NOT NULL,
        current_x    REAL    NOT NULL,
        current_y    REAL    NOT NULL,
        battery      REAL    NOT NULL,
        status       TEXT    NOT NULL,
        current_task INTEGER
    );
    CREATE TABLE IF NOT EXISTS tasks (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        robot_id      INTEGER NOT NULL REFERENCES robots(id) ON DELETE CASCADE,
        target_x      REAL    NOT NULL,
        target_y      REAL    NOT NULL,
        complete      INTEGER NOT NULL DEFAULT 0,
        kind          TEXT    NOT NULL,
        priority      INTEGER NOT NULL,
        created_at_ms INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS tasks_by_robot ON tasks (robot_id, complete);";

const ROBOT_COLUMNS: &str =
    "id, name, start_x, start_y, current_x, current_y, battery, status, current_task";

const TASK_COLUMNS: &str =
    "id, robot_id, target_x, target_y, complete, kind, priority, created_at_ms";

const TASK_ORDER: &str = " ORDER BY priority DESC, created_at_ms ASC, id ASC";

// ── SqliteStore ───────────────────────────────────────────────────────────────

/// A [`FleetStore`] backed by one SQLite connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and initialise the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        Self::init(conn)
    }

    /// A private in-memory database, discarded on drop.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

impl FleetStore for SqliteStore {
    fn with_session<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut dyn Session) -> StoreResult<T>,
    {
        // A panic inside an earlier session already rolled its transaction
        // back when it unwound, so the connection is still consistent.
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let mut session = SqliteSession { tx: conn.transaction()? };
        let out = f(&mut session)?;
        session.tx.commit()?;
        Ok(out)
    }
}

// ── SqliteSession ─────────────────────────────────────────────────────────────

/// A [`Session`] over one open transaction.  Dropping it uncommitted rolls
/// back.
struct SqliteSession<'c> {
    tx: Transaction<'c>,
}

impl SqliteSession<'_> {
    fn robot_exists(&self, id: RobotId) -> StoreResult<bool> {
        let found = self
            .tx
            .query_row("SELECT 1 FROM robots WHERE id = ?1", [id.0], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn name_taken(&self, name: &str, except: Option<RobotId>) -> StoreResult<bool> {
        let found: Option<i64> = self
            .tx
            .query_row("SELECT id FROM robots WHERE name = ?1", [name], |r| r.get(0))
            .optional()?;
        Ok(matches!(found, Some(id) if Some(RobotId(id)) != except))
    }
}

impl Session for SqliteSession<'_> {
    // ── Robots ────────────────────────────────────────────────────────────

    fn robots(&mut self) -> StoreResult<Vec<Robot>> {
        let mut stmt = self
            .tx
            .prepare_cached(&format!("SELECT {ROBOT_COLUMNS} FROM robots ORDER BY id"))?;
        let robots = stmt
            .query_map([], robot_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(robots)
    }

    fn robot(&mut self, id: RobotId) -> StoreResult<Option<Robot>> {
        let robot = self
            .tx
            .query_row(
                &format!("SELECT {ROBOT_COLUMNS} FROM robots WHERE id = ?1"),
                [id.0],
                robot_from_row,
            )
            .optional()?;
        Ok(robot)
    }

    fn insert_robot(&mut self, new: &NewRobot) -> StoreResult<Robot> {
        if new.name.trim().is_empty() {
            return Err(StoreError::InvalidRecord("robot name is empty".into()));
        }
        if !new.start.is_finite() {
            return Err(StoreError::InvalidRecord(format!(
                "robot {:?} has a non-finite start position",
                new.name
            )));
        }
        if self.name_taken(&new.name, None)? {
            return Err(StoreError::DuplicateRobotName(new.name.clone()));
        }

        let battery = clamp_battery(new.battery);
        self.tx.execute(
            "INSERT INTO robots \
             (name, start_x, start_y, current_x, current_y, battery, status, current_task) \
             VALUES (?1, ?2, ?3, ?2, ?3, ?4, ?5, NULL)",
            params![new.name, new.start.x, new.start.y, battery, new.status.as_str()],
        )?;

        Ok(Robot {
            id:           RobotId(self.tx.last_insert_rowid()),
            name:         new.name.clone(),
            start:        new.start,
            current:      new.start,
            battery,
            status:       new.status,
            current_task: None,
        })
    }

    fn update_robot(&mut self, robot: &Robot) -> StoreResult<()> {
        if self.name_taken(&robot.name, Some(robot.id))? {
            return Err(StoreError::DuplicateRobotName(robot.name.clone()));
        }
        let changed = self.tx.execute(
            "UPDATE robots SET name = ?2, start_x = ?3, start_y = ?4, current_x = ?5, \
             current_y = ?6, battery = ?7, status = ?8, current_task = ?9 WHERE id = ?1",
            params![
                robot.id.0,
                robot.name,
                robot.start.x,
                robot.start.y,
                robot.current.x,
                robot.current.y,
                clamp_battery(robot.battery),
                robot.status.as_str(),
                robot.current_task.map(TaskId::get),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::RobotNotFound(robot.id));
        }
        Ok(())
    }

    fn delete_robot(&mut self, id: RobotId) -> StoreResult<bool> {
        self.tx.execute("DELETE FROM tasks WHERE robot_id = ?1", [id.0])?;
        let removed = self.tx.execute("DELETE FROM robots WHERE id = ?1", [id.0])?;
        Ok(removed > 0)
    }

    // ── Tasks ─────────────────────────────────────────────────────────────

    fn tasks(&mut self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let (clause, args) = task_where(filter);
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks{clause}{TASK_ORDER}");
        let mut stmt = self.tx.prepare_cached(&sql)?;
        let tasks = stmt
            .query_map(params_from_iter(args), task_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    fn first_task(&mut self, filter: &TaskFilter) -> StoreResult<Option<Task>> {
        let (clause, args) = task_where(filter);
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks{clause}{TASK_ORDER} LIMIT 1");
        let mut stmt = self.tx.prepare_cached(&sql)?;
        let task = stmt
            .query_row(params_from_iter(args), task_from_row)
            .optional()?;
        Ok(task)
    }

    fn task(&mut self, id: TaskId) -> StoreResult<Option<Task>> {
        let task = self
            .tx
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                [id.0],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    fn insert_task(&mut self, new: &NewTask) -> StoreResult<Task> {
        if !new.target.is_finite() {
            return Err(StoreError::InvalidRecord("task target is not finite".into()));
        }
        if !self.robot_exists(new.robot)? {
            return Err(StoreError::RobotNotFound(new.robot));
        }

        let created_at_ms = now_unix_millis();
        self.tx.execute(
            "INSERT INTO tasks \
             (robot_id, target_x, target_y, complete, kind, priority, created_at_ms) \
             VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6)",
            params![
                new.robot.0,
                new.target.x,
                new.target.y,
                new.kind().as_str(),
                new.priority,
                created_at_ms,
            ],
        )?;

        Ok(Task {
            id:       TaskId(self.tx.last_insert_rowid()),
            robot:    new.robot,
            target:   new.target,
            complete: false,
            kind:     new.kind(),
            priority: new.priority,
            created_at_ms,
        })
    }

    fn update_task(&mut self, task: &Task) -> StoreResult<()> {
        if !self.robot_exists(task.robot)? {
            return Err(StoreError::RobotNotFound(task.robot));
        }
        let changed = self.tx.execute(
            "UPDATE tasks SET robot_id = ?2, target_x = ?3, target_y = ?4, complete = ?5, \
             kind = ?6, priority = ?7 WHERE id = ?1",
            params![
                task.id.0,
                task.robot.0,
                task.target.x,
                task.target.y,
                task.complete,
                task.kind.as_str(),
                task.priority,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::TaskNotFound(task.id));
        }
        Ok(())
    }

    fn delete_task(&mut self, id: TaskId) -> StoreResult<bool> {
        let removed = self.tx.execute("DELETE FROM tasks WHERE id = ?1", [id.0])?;
        Ok(removed > 0)
    }

    fn delete_tasks(&mut self, filter: &TaskFilter) -> StoreResult<usize> {
        let (clause, args) = task_where(filter);
        let removed = self
            .tx
            .execute(&format!("DELETE FROM tasks{clause}"), params_from_iter(args))?;
        Ok(removed)
    }

    fn count_tasks(&mut self, filter: &TaskFilter) -> StoreResult<usize> {
        let (clause, args) = task_where(filter);
        let count: i64 = self.tx.query_row(
            &format!("SELECT COUNT(*) FROM tasks{clause}"),
            params_from_iter(args),
            |r| r.get(0),
        )?;
        Ok(count as usize)
    }

    fn set_tasks_complete(&mut self, filter: &TaskFilter, complete: bool) -> StoreResult<usize> {
        let (clause, mut args) = task_where(filter);
        // Bind the new value after the filter arguments.
        args.push(Value::Integer(complete as i64));
        let sql = format!("UPDATE tasks SET complete = ?{}{clause}", args.len());
        let changed = self.tx.execute(&sql, params_from_iter(args))?;
        Ok(changed)
    }
}

// ── Row mapping ───────────────────────────────────────────────────────────────

fn robot_from_row(row: &Row<'_>) -> rusqlite::Result<Robot> {
    Ok(Robot {
        id:           RobotId(row.get(0)?),
        name:         row.get(1)?,
        start:        Point::new(row.get(2)?, row.get(3)?),
        current:      Point::new(row.get(4)?, row.get(5)?),
        battery:      row.get(6)?,
        status:       parse_column(row, 7)?,
        current_task: row.get::<_, Option<i64>>(8)?.map(TaskId),
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id:            TaskId(row.get(0)?),
        robot:         RobotId(row.get(1)?),
        target:        Point::new(row.get(2)?, row.get(3)?),
        complete:      row.get(4)?,
        kind:          parse_column(row, 5)?,
        priority:      row.get(6)?,
        created_at_ms: row.get(7)?,
    })
}

/// Read a TEXT column into one of the core string enums.
fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = FleetError>,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Build ` WHERE …` (or an empty string) plus positional arguments `?1..?n`.
fn task_where(filter: &TaskFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut args = Vec::new();

    if let Some(robot) = filter.robot {
        args.push(Value::Integer(robot.0));
        clauses.push(format!("robot_id = ?{}", args.len()));
    }
    if let Some(complete) = filter.complete {
        args.push(Value::Integer(complete as i64));
        clauses.push(format!("complete = ?{}", args.len()));
    }
    if let Some(kind) = filter.kind {
        args.push(Value::Text(kind.as_str().to_owned()));
        clauses.push(format!("kind = ?{}", args.len()));
    }
    if let Some(kind) = filter.exclude_kind {
        args.push(Value::Text(kind.as_str().to_owned()));
        clauses.push(format!("kind <> ?{}", args.len()));
    }

    if clauses.is_empty() {
        (String::new(), args)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), args)
    }
}

fn clamp_battery(level: f64) -> f64 {
    if level.is_nan() { 0.0 } else { level.clamp(0.0, FULL_BATTERY) }
}
