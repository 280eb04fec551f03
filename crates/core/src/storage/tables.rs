use std::fmt;

/// Logical tables of the tutoring store.
///
/// The name doubles as the SQL table name and as the key under which the
/// key-value backends keep the table's JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Sessions,
    TeacherSubjects,
    Ratings,
    Notifications,
}

impl Table {
    pub const COUNT: usize = 5;

    /// All tables, in creation order (referenced tables first).
    pub const ALL: [Table; Table::COUNT] = [
        Table::Users,
        Table::Sessions,
        Table::TeacherSubjects,
        Table::Ratings,
        Table::Notifications,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Sessions => "sesiones",
            Table::TeacherSubjects => "maestro_materias",
            Table::Ratings => "calificaciones",
            Table::Notifications => "notificaciones",
        }
    }

    /// Entity name used in error messages.
    pub fn entity_type(&self) -> &'static str {
        match self {
            Table::Users => "User",
            Table::Sessions => "Session",
            Table::TeacherSubjects => "TeacherSubject",
            Table::Ratings => "Rating",
            Table::Notifications => "Notification",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_match_persisted_layout() {
        let names: Vec<&str> = Table::ALL.iter().map(Table::name).collect();
        assert_eq!(
            names,
            vec![
                "users",
                "sesiones",
                "maestro_materias",
                "calificaciones",
                "notificaciones"
            ]
        );
    }
}
