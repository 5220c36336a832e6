use serde::{Deserialize, Serialize};

/// Mapped result of the PDF analysis service for an uploaded PEA document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PdfAnalysis {
    pub informacion_general: GeneralInfo,
    pub contenido_academico: AcademicContent,
    pub unidades_curriculares: Vec<CurricularUnit>,
    pub estadisticas: AnalysisStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralInfo {
    pub nombre_asignatura: Option<String>,
    pub codigo: Option<String>,
    pub semestre: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AcademicContent {
    pub descripcion: Option<String>,
    pub objetivo_general: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurricularUnit {
    pub numero: Option<i64>,
    pub nombre: Option<String>,
    pub conceptos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisStats {
    pub paginas: Option<u32>,
    pub total_conceptos: Option<u32>,
}
