use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog row. Backends hand out integer keys, but some
/// catalogs are keyed by short codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogId {
    Int(i64),
    Text(String),
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for CatalogId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for CatalogId {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for CatalogId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl CatalogId {
    /// Parses a command-line style id: digits become `Int`, anything else `Text`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        raw.parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Text(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogId,
    pub name: String,
}

impl CatalogItem {
    pub fn new(id: impl Into<CatalogId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Wire keys of one catalog's rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSchema {
    pub id_field: String,
    pub name_field: String,
}

impl CatalogSchema {
    pub fn new(name_field: impl Into<String>) -> Self {
        Self {
            id_field: "id".into(),
            name_field: name_field.into(),
        }
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    ObrasSociales,
    Antecedentes,
    AnalisisFuncional,
    Tratamientos,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 4] = [
        CatalogKind::ObrasSociales,
        CatalogKind::Antecedentes,
        CatalogKind::AnalisisFuncional,
        CatalogKind::Tratamientos,
    ];

    pub fn name_field(self) -> &'static str {
        match self {
            Self::ObrasSociales => "nombre_os",
            Self::Antecedentes => "nombre_ant",
            Self::AnalisisFuncional => "nombre_analisis",
            Self::Tratamientos => "nombre_trat",
        }
    }

    /// Collection endpoint relative to the API root, with the trailing slash
    /// the backend routes expect.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::ObrasSociales => "pacientes/obras-sociales/",
            Self::Antecedentes => "pacientes/antecedentes/",
            Self::AnalisisFuncional => "pacientes/analisis-funcional/",
            Self::Tratamientos => "historias_clinicas/tratamientos/",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ObrasSociales => "obra social",
            Self::Antecedentes => "antecedente",
            Self::AnalisisFuncional => "análisis funcional",
            Self::Tratamientos => "tratamiento",
        }
    }

    pub fn schema(self) -> CatalogSchema {
        CatalogSchema::new(self.name_field())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "obras_sociales" | "os" => Some(Self::ObrasSociales),
            "antecedentes" => Some(Self::Antecedentes),
            "analisis_funcional" => Some(Self::AnalisisFuncional),
            "tratamientos" => Some(Self::Tratamientos),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ObrasSociales => "obras-sociales",
            Self::Antecedentes => "antecedentes",
            Self::AnalisisFuncional => "analisis-funcional",
            Self::Tratamientos => "tratamientos",
        };
        f.write_str(name)
    }
}
