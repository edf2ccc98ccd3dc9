//! SQL schema for the rollcall SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.
//!
//! Dates are stored as `YYYY-MM-DD` and wall-clock times as `HH:MM:SS`, so
//! plain text comparison orders them correctly. Days of the week are stored
//! as ISO numbers (1 = Monday … 7 = Sunday).

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS classes (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    start_date    TEXT    NOT NULL,
    end_date      TEXT    NOT NULL,
    is_active     INTEGER NOT NULL DEFAULT 1,
    semester      TEXT    NOT NULL,
    academic_year TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS class_members (
    class_id   INTEGER NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
    student_id INTEGER NOT NULL,
    PRIMARY KEY (class_id, student_id)
);

-- Overlap between slots is checked by the core before writes, not here.
CREATE TABLE IF NOT EXISTS timetable (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    course_id     INTEGER NOT NULL,
    teacher_id    INTEGER NOT NULL,
    class_id      INTEGER NOT NULL,
    day_of_week   INTEGER NOT NULL CHECK (day_of_week BETWEEN 1 AND 7),
    start_time    TEXT    NOT NULL,
    end_time      TEXT    NOT NULL,
    semester      TEXT    NOT NULL,
    academic_year TEXT    NOT NULL,
    CHECK (start_time < end_time)
);

-- One row per (student, course, date); re-marking updates in place.
CREATE TABLE IF NOT EXISTS attendance (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL,
    class_id   INTEGER,
    course_id  INTEGER NOT NULL,
    teacher_id INTEGER NOT NULL,
    date       TEXT    NOT NULL,
    status     TEXT    NOT NULL,   -- 'present' | 'absent' | 'late'
    notes      TEXT,
    created_at TEXT    NOT NULL,   -- RFC 3339 UTC
    updated_at TEXT    NOT NULL,
    UNIQUE (student_id, course_id, date)
);

-- Append-only; no natural key.
CREATE TABLE IF NOT EXISTS grades (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id    INTEGER NOT NULL,
    course_id     INTEGER NOT NULL,
    teacher_id    INTEGER NOT NULL,
    grade         TEXT    NOT NULL,
    semester      TEXT    NOT NULL,
    academic_year TEXT    NOT NULL,
    comments      TEXT,
    created_at    TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS timetable_day_idx      ON timetable(semester, day_of_week);
CREATE INDEX IF NOT EXISTS timetable_class_idx    ON timetable(class_id);
CREATE INDEX IF NOT EXISTS class_members_student  ON class_members(student_id);
CREATE INDEX IF NOT EXISTS attendance_course_date ON attendance(course_id, date);
CREATE INDEX IF NOT EXISTS grades_student_idx     ON grades(student_id);

PRAGMA user_version = 1;
";
