//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Foreign keys are declared for documentation only:
//! every connection runs [`DISABLE_FOREIGN_KEYS`] on open, so references are
//! not enforced, the same as in the key-value backends.

use tutorias_core::storage::Table;

/// Bundled SQLite builds enforce foreign keys by default.
pub const DISABLE_FOREIGN_KEYS: &str = "PRAGMA foreign_keys = OFF;";

pub const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT,
    password TEXT NOT NULL,
    user_type TEXT NOT NULL,
    grupo TEXT,
    matricula TEXT,
    edificio TEXT
);
CREATE INDEX IF NOT EXISTS idx_users_user_type ON users(user_type);
"#;

pub const CREATE_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS sesiones (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    usuario_id INTEGER NOT NULL,
    tutor_id INTEGER,
    materia TEXT NOT NULL,
    fecha TEXT NOT NULL,
    hora TEXT NOT NULL,
    estado TEXT NOT NULL DEFAULT 'pendiente',
    created_at TEXT NOT NULL,
    FOREIGN KEY (usuario_id) REFERENCES users(id),
    FOREIGN KEY (tutor_id) REFERENCES users(id)
);
CREATE INDEX IF NOT EXISTS idx_sesiones_usuario_id ON sesiones(usuario_id);
CREATE INDEX IF NOT EXISTS idx_sesiones_tutor_id ON sesiones(tutor_id);
"#;

pub const CREATE_TEACHER_SUBJECTS: &str = r#"
CREATE TABLE IF NOT EXISTS maestro_materias (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    maestro_id INTEGER NOT NULL,
    materia TEXT NOT NULL,
    UNIQUE (maestro_id, materia),
    FOREIGN KEY (maestro_id) REFERENCES users(id)
);
CREATE INDEX IF NOT EXISTS idx_maestro_materias_materia ON maestro_materias(materia);
"#;

pub const CREATE_RATINGS: &str = r#"
CREATE TABLE IF NOT EXISTS calificaciones (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tutor_id INTEGER,
    alumno_id INTEGER,
    materia TEXT,
    calificacion INTEGER NOT NULL CHECK (calificacion BETWEEN 1 AND 5),
    comentario TEXT,
    usuario_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    CHECK ((tutor_id IS NULL) <> (alumno_id IS NULL)),
    FOREIGN KEY (tutor_id) REFERENCES users(id),
    FOREIGN KEY (alumno_id) REFERENCES users(id),
    FOREIGN KEY (usuario_id) REFERENCES users(id)
);
CREATE INDEX IF NOT EXISTS idx_calificaciones_tutor_id ON calificaciones(tutor_id);
CREATE INDEX IF NOT EXISTS idx_calificaciones_alumno_id ON calificaciones(alumno_id);
"#;

pub const CREATE_NOTIFICATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS notificaciones (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    usuario_id INTEGER NOT NULL,
    tipo TEXT NOT NULL,
    titulo TEXT NOT NULL,
    descripcion TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (usuario_id) REFERENCES users(id)
);
CREATE INDEX IF NOT EXISTS idx_notificaciones_usuario_id ON notificaciones(usuario_id);
"#;

/// Returns the DDL batch that creates a table.
pub fn create_statement(table: Table) -> &'static str {
    match table {
        Table::Users => CREATE_USERS,
        Table::Sessions => CREATE_SESSIONS,
        Table::TeacherSubjects => CREATE_TEACHER_SUBJECTS,
        Table::Ratings => CREATE_RATINGS,
        Table::Notifications => CREATE_NOTIFICATIONS,
    }
}

// User queries
pub const USER_COLUMNS: &str =
    "id, name, email, phone, password, user_type, grupo, matricula, edificio";

pub const INSERT_USER: &str = r#"
INSERT INTO users (name, email, phone, password, user_type, grupo, matricula, edificio)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, name, email, phone, password, user_type, grupo, matricula, edificio
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, name, email, phone, password, user_type, grupo, matricula, edificio
FROM users
WHERE email = ?1
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users
SET name = ?2, email = ?3, phone = ?4, password = ?5, user_type = ?6,
    grupo = ?7, matricula = ?8, edificio = ?9
WHERE id = ?1
"#;

pub const DELETE_USER: &str = r#"
DELETE FROM users
WHERE id = ?1
"#;

/// Builds `SELECT ... WHERE user_type IN (?1, ..., ?n)` for `count` roles.
pub fn select_users_by_type(count: usize) -> String {
    let placeholders: Vec<String> = (1..=count).map(|i| format!("?{i}")).collect();
    format!(
        "SELECT {USER_COLUMNS} FROM users WHERE user_type IN ({}) ORDER BY id ASC",
        placeholders.join(", ")
    )
}

// Session queries
pub const INSERT_SESSION: &str = r#"
INSERT INTO sesiones (usuario_id, tutor_id, materia, fecha, hora, estado, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_SESSION_BY_ID: &str = r#"
SELECT id, usuario_id, tutor_id, materia, fecha, hora, estado, created_at
FROM sesiones
WHERE id = ?1
"#;

pub const SELECT_SESSIONS_BY_STUDENT: &str = r#"
SELECT id, usuario_id, tutor_id, materia, fecha, hora, estado, created_at
FROM sesiones
WHERE usuario_id = ?1
ORDER BY fecha ASC, hora ASC, id ASC
"#;

pub const SELECT_SESSIONS_BY_TUTOR: &str = r#"
SELECT id, usuario_id, tutor_id, materia, fecha, hora, estado, created_at
FROM sesiones
WHERE tutor_id = ?1
ORDER BY fecha ASC, hora ASC, id ASC
"#;

pub const SELECT_CONFLICTING_SESSION: &str = r#"
SELECT id, usuario_id, tutor_id, materia, fecha, hora, estado, created_at
FROM sesiones
WHERE tutor_id = ?1 AND fecha = ?2 AND hora = ?3
  AND estado IN ('pendiente', 'aceptada')
  AND (?4 IS NULL OR id <> ?4)
ORDER BY id ASC
LIMIT 1
"#;

pub const UPDATE_SESSION: &str = r#"
UPDATE sesiones
SET tutor_id = ?2, materia = ?3, fecha = ?4, hora = ?5, estado = ?6
WHERE id = ?1
"#;

pub const DELETE_SESSION: &str = r#"
DELETE FROM sesiones
WHERE id = ?1
"#;

// Teacher-subject queries
pub const INSERT_OR_IGNORE_TEACHER_SUBJECT: &str = r#"
INSERT OR IGNORE INTO maestro_materias (maestro_id, materia)
VALUES (?1, ?2)
"#;

pub const SELECT_TEACHER_SUBJECT: &str = r#"
SELECT id, maestro_id, materia
FROM maestro_materias
WHERE maestro_id = ?1 AND materia = ?2
"#;

pub const SELECT_SUBJECTS_BY_TUTOR: &str = r#"
SELECT materia
FROM maestro_materias
WHERE maestro_id = ?1
ORDER BY id ASC
"#;

pub const SELECT_TUTORS_BY_SUBJECT: &str = r#"
SELECT u.id, u.name, u.email, u.phone, u.password, u.user_type, u.grupo, u.matricula, u.edificio
FROM users u
INNER JOIN maestro_materias m ON u.id = m.maestro_id
WHERE m.materia = ?1
ORDER BY u.id ASC
"#;

pub const SELECT_ALL_SUBJECTS: &str = r#"
SELECT DISTINCT materia
FROM maestro_materias
ORDER BY materia ASC
"#;

pub const DELETE_TEACHER_SUBJECT: &str = r#"
DELETE FROM maestro_materias
WHERE maestro_id = ?1 AND materia = ?2
"#;

// Rating queries
pub const INSERT_RATING: &str = r#"
INSERT INTO calificaciones
    (tutor_id, alumno_id, materia, calificacion, comentario, usuario_id, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_RATINGS_FOR_TUTOR: &str = r#"
SELECT id, tutor_id, alumno_id, materia, calificacion, comentario, usuario_id, created_at
FROM calificaciones
WHERE tutor_id = ?1 AND (?2 IS NULL OR materia = ?2)
ORDER BY id ASC
"#;

pub const SELECT_RATINGS_FOR_STUDENT: &str = r#"
SELECT id, tutor_id, alumno_id, materia, calificacion, comentario, usuario_id, created_at
FROM calificaciones
WHERE alumno_id = ?1
ORDER BY id ASC
"#;

// Notification queries
pub const INSERT_NOTIFICATION: &str = r#"
INSERT INTO notificaciones (usuario_id, tipo, titulo, descripcion, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_NOTIFICATIONS_BY_USER: &str = r#"
SELECT id, usuario_id, tipo, titulo, descripcion, created_at
FROM notificaciones
WHERE usuario_id = ?1
ORDER BY created_at DESC, id DESC
"#;

pub const DELETE_NOTIFICATION: &str = r#"
DELETE FROM notificaciones
WHERE id = ?1
"#;

pub const DELETE_NOTIFICATIONS_BY_USER: &str = r#"
DELETE FROM notificaciones
WHERE usuario_id = ?1
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_statements_use_table_names() {
        for table in Table::ALL {
            let ddl = create_statement(table);
            assert!(ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table.name())));
        }
    }

    #[test]
    fn test_select_users_by_type_placeholders() {
        let sql = select_users_by_type(3);
        assert!(sql.contains("IN (?1, ?2, ?3)"));
        assert!(sql.ends_with("ORDER BY id ASC"));
    }

    #[test]
    fn test_session_lists_are_ordered_by_date_then_time() {
        assert!(SELECT_SESSIONS_BY_STUDENT.contains("ORDER BY fecha ASC, hora ASC"));
        assert!(SELECT_SESSIONS_BY_TUTOR.contains("ORDER BY fecha ASC, hora ASC"));
    }

    #[test]
    fn test_teacher_subject_insert_ignores_duplicates() {
        assert!(INSERT_OR_IGNORE_TEACHER_SUBJECT.contains("INSERT OR IGNORE"));
        assert!(CREATE_TEACHER_SUBJECTS.contains("UNIQUE (maestro_id, materia)"));
    }
}
