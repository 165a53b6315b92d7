//! Resource release tests with a recording driver
//!
//! The mock driver logs every acquisition and every drop, and can be told
//! to fail at any step. Each test checks that whatever was acquired is
//! released exactly once, innermost first.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use dbtemplate::{
    map_with, params, Connection, ConnectionSource, Cursor, Error, Result, Row, RowExt, Stage,
    Statement, Template, Value,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum FailAt {
    Acquire,
    Prepare,
    Bind,
    Update,
    Query,
    Advance(usize),
}

type Log = Rc<RefCell<Vec<String>>>;

struct MockSource {
    log: Log,
    fail: Option<FailAt>,
    rows: Vec<i64>,
}

struct MockConnection {
    log: Log,
    fail: Option<FailAt>,
    rows: Vec<i64>,
}

struct MockStatement<'c> {
    conn: &'c MockConnection,
}

struct MockCursor {
    log: Log,
    fail: Option<FailAt>,
    columns: Vec<String>,
    rows: Vec<MockRow>,
    position: usize,
}

struct MockRow(i64);

impl MockSource {
    fn new(rows: Vec<i64>, fail: Option<FailAt>) -> (Self, Log) {
        let log = Log::default();
        let source = Self {
            log: log.clone(),
            fail,
            rows,
        };
        (source, log)
    }
}

impl ConnectionSource for MockSource {
    type Connection = MockConnection;

    fn acquire(&self) -> Result<MockConnection> {
        if self.fail == Some(FailAt::Acquire) {
            return Err(Error::Connection("refused".into()));
        }
        self.log.borrow_mut().push("acquire".into());
        Ok(MockConnection {
            log: self.log.clone(),
            fail: self.fail,
            rows: self.rows.clone(),
        })
    }
}

impl Connection for MockConnection {
    type Statement<'c> = MockStatement<'c> where Self: 'c;

    fn prepare(&self, _sql: &str) -> Result<MockStatement<'_>> {
        if self.fail == Some(FailAt::Prepare) {
            return Err(Error::Query("syntax error".into()));
        }
        self.log.borrow_mut().push("prepare".into());
        Ok(MockStatement { conn: self })
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.log.borrow_mut().push("release connection".into());
    }
}

impl<'c> Statement for MockStatement<'c> {
    type Cursor<'s> = MockCursor where Self: 's;

    fn parameter_count(&self) -> usize {
        1
    }

    fn bind(&mut self, index: usize, _value: &Value) -> Result<()> {
        if self.conn.fail == Some(FailAt::Bind) {
            return Err(Error::Query("cannot bind".into()));
        }
        self.conn.log.borrow_mut().push(format!("bind {}", index));
        Ok(())
    }

    fn execute_update(&mut self) -> Result<u64> {
        if self.conn.fail == Some(FailAt::Update) {
            return Err(Error::Query("constraint violated".into()));
        }
        self.conn.log.borrow_mut().push("update".into());
        Ok(1)
    }

    fn execute_query(&mut self) -> Result<MockCursor> {
        if self.conn.fail == Some(FailAt::Query) {
            return Err(Error::Query("query failed".into()));
        }
        self.conn.log.borrow_mut().push("query".into());
        Ok(MockCursor {
            log: self.conn.log.clone(),
            fail: self.conn.fail,
            columns: vec!["n".to_string()],
            rows: self.conn.rows.iter().copied().map(MockRow).collect(),
            position: 0,
        })
    }
}

impl Drop for MockStatement<'_> {
    fn drop(&mut self) {
        self.conn.log.borrow_mut().push("release statement".into());
    }
}

impl Cursor for MockCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> Result<Option<&dyn Row>> {
        if self.fail == Some(FailAt::Advance(self.position)) {
            return Err(Error::Query("connection reset".into()));
        }
        let row = self.rows.get(self.position);
        self.position += 1;
        Ok(row.map(|r| r as &dyn Row))
    }
}

impl Drop for MockCursor {
    fn drop(&mut self) {
        self.log.borrow_mut().push("release cursor".into());
    }
}

impl Row for MockRow {
    fn column_count(&self) -> usize {
        1
    }

    fn column_name(&self, index: usize) -> Option<&str> {
        (index == 0).then_some("n")
    }

    fn value_at(&self, index: usize) -> Result<Value> {
        match index {
            0 => Ok(Value::Int(self.0)),
            _ => Err(Error::ColumnNotFound(format!("#{}", index))),
        }
    }
}

fn events(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn count(log: &Log, event: &str) -> usize {
    log.borrow().iter().filter(|e| e.as_str() == event).count()
}

fn query(template: &Template<MockSource>) -> std::result::Result<Vec<i64>, dbtemplate::ExecutionError> {
    template.execute("SELECT n FROM t WHERE n > ?", map_with(|row| row.get("n")), &params![0])
}

// ============ Query Tests ============

#[test]
fn test_query_success_releases_innermost_first() {
    common::init_tracing();
    let (source, log) = MockSource::new(vec![1, 2, 3], None);
    let template = Template::new(source);

    assert_eq!(query(&template).unwrap(), vec![1, 2, 3]);
    assert_eq!(
        events(&log),
        [
            "acquire",
            "prepare",
            "bind 1",
            "query",
            "release cursor",
            "release statement",
            "release connection",
        ]
    );
}

#[test]
fn test_acquire_failure_releases_nothing() {
    let (source, log) = MockSource::new(vec![1], Some(FailAt::Acquire));
    let template = Template::new(source);

    let err = query(&template).unwrap_err();
    assert_eq!(err.stage(), Stage::Acquire);
    assert!(matches!(err.cause(), Error::Connection(_)));
    assert!(events(&log).is_empty());
}

#[test]
fn test_prepare_failure_releases_connection() {
    let (source, log) = MockSource::new(vec![1], Some(FailAt::Prepare));
    let template = Template::new(source);

    let err = query(&template).unwrap_err();
    assert_eq!(err.stage(), Stage::Prepare);
    assert_eq!(events(&log), ["acquire", "release connection"]);
}

#[test]
fn test_bind_failure_releases_statement_and_connection() {
    let (source, log) = MockSource::new(vec![1], Some(FailAt::Bind));
    let template = Template::new(source);

    let err = query(&template).unwrap_err();
    assert_eq!(err.stage(), Stage::Bind);
    assert_eq!(
        events(&log),
        ["acquire", "prepare", "release statement", "release connection"]
    );
}

#[test]
fn test_parameter_count_failure_releases_statement_and_connection() {
    let (source, log) = MockSource::new(vec![1], None);
    let template = Template::new(source);

    let err = template
        .execute("SELECT n FROM t", map_with(|row| row.get::<i64>("n")), &[])
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Bind);
    assert_eq!(count(&log, "release statement"), 1);
    assert_eq!(count(&log, "release connection"), 1);
}

#[test]
fn test_query_failure_releases_statement_and_connection() {
    let (source, log) = MockSource::new(vec![1], Some(FailAt::Query));
    let template = Template::new(source);

    let err = query(&template).unwrap_err();
    assert_eq!(err.stage(), Stage::Execute);
    assert_eq!(
        events(&log),
        [
            "acquire",
            "prepare",
            "bind 1",
            "release statement",
            "release connection"
        ]
    );
}

#[test]
fn test_cursor_failure_mid_iteration_releases_everything() {
    let (source, log) = MockSource::new(vec![1, 2, 3], Some(FailAt::Advance(2)));
    let template = Template::new(source);

    let err = query(&template).unwrap_err();
    assert_eq!(err.stage(), Stage::Execute);
    assert!(matches!(err.cause(), Error::Query(_)));
    assert_eq!(
        &events(&log)[4..],
        ["release cursor", "release statement", "release connection"]
    );
}

#[test]
fn test_mapper_failure_releases_everything() {
    let (source, log) = MockSource::new(vec![1, 2, 3], None);
    let template = Template::new(source);

    let err = template
        .execute(
            "SELECT n FROM t WHERE n > ?",
            map_with(|row| {
                let n: i64 = row.get("n")?;
                if n == 2 {
                    return Err(Error::mapping("even"));
                }
                Ok(n)
            }),
            &params![0],
        )
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Map);
    assert!(matches!(err.cause(), Error::RowMapping { row: 2, .. }));
    for event in ["release cursor", "release statement", "release connection"] {
        assert_eq!(count(&log, event), 1, "{} should happen once", event);
    }
}

#[test]
fn test_execute_one_uses_single_connection() {
    let (source, log) = MockSource::new(vec![5, 6], None);
    let template = Template::new(source);

    let first = template
        .execute_one("SELECT n FROM t WHERE n > ?", map_with(|row| row.get::<i64>("n")), &params![0])
        .unwrap();
    assert_eq!(first, Some(5));
    assert_eq!(count(&log, "acquire"), 1);
    assert_eq!(count(&log, "release connection"), 1);
}

// ============ Update Tests ============

#[test]
fn test_update_success_runs_once_and_releases() {
    let (source, log) = MockSource::new(vec![], None);
    let template = Template::new(source);

    template
        .execute_update("UPDATE t SET n = ?", &params![1])
        .unwrap();
    assert_eq!(
        events(&log),
        [
            "acquire",
            "prepare",
            "bind 1",
            "update",
            "release statement",
            "release connection"
        ]
    );
}

#[test]
fn test_update_failure_releases() {
    let (source, log) = MockSource::new(vec![], Some(FailAt::Update));
    let template = Template::new(source);

    let err = template
        .execute_update("UPDATE t SET n = ?", &params![1])
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Execute);
    assert_eq!(count(&log, "update"), 0);
    assert_eq!(count(&log, "release statement"), 1);
    assert_eq!(count(&log, "release connection"), 1);
}

#[test]
fn test_each_call_acquires_its_own_connection() {
    let (source, log) = MockSource::new(vec![1], None);
    let template = Template::new(source);

    query(&template).unwrap();
    template
        .execute_update("UPDATE t SET n = ?", &params![2])
        .unwrap();
    query(&template).unwrap();

    assert_eq!(count(&log, "acquire"), 3);
    assert_eq!(count(&log, "release connection"), 3);
}
