//! `SQLite` schema definitions for roster.

/// SQL statement to create the collaborators table.
pub const CREATE_COLLABORATORS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS colaboradores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nome_completo TEXT NOT NULL,
    endereco TEXT,
    bairro TEXT,
    cidade TEXT,
    estado TEXT,
    cep TEXT,
    telefone TEXT,
    data_nascimento DATE,
    cargo TEXT,
    data_cadastro TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
";

/// Column list shared by every read, in [`super::Repository`] row order.
pub const SELECT_COLUMNS: &str = "id, nome_completo, endereco, bairro, cidade, estado, \
     cep, telefone, data_nascimento, cargo, data_cadastro";

/// Format `CURRENT_TIMESTAMP` writes into `data_cadastro`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
