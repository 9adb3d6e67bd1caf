//! The assistant's sales persona: system instruction, catalog, fallback reply.

use once_cell::sync::Lazy;

/// One course in the assistant's knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    /// Full course title.
    pub title: &'static str,
    /// Price in whole BRL.
    pub price_brl: u32,
    /// Difficulty level label.
    pub level: &'static str,
    /// Total workload in hours.
    pub duration_hours: u32,
    /// One-line positioning used in the system instruction.
    pub focus: &'static str,
}

/// The fixed catalog the assistant is allowed to discuss.
pub const CATALOG: [Course; 3] = [
    Course {
        title: "Prompt Engineering Jurídico",
        price_brl: 497,
        level: "Iniciante",
        duration_hours: 20,
        focus: "Foco em produtividade e peças rápidas.",
    },
    Course {
        title: "Compliance & Ética na Era da IA",
        price_brl: 697,
        level: "Intermediário",
        duration_hours: 35,
        focus: "Foco em consultoria e regulação.",
    },
    Course {
        title: "Legal Ops & Automação Full Stack",
        price_brl: 997,
        level: "Avançado",
        duration_hours: 50,
        focus: "Foco em automação e gestão.",
    },
];

/// System instruction sent on every model call.
///
/// Persona, allowed catalog, tone and length constraints. The catalog lines
/// are generated from [`CATALOG`] so prices stay in one place.
pub static SYSTEM_INSTRUCTION: Lazy<String> = Lazy::new(|| {
    let mut instruction = String::from(
        "Você é o Consultor Sênior de Carreira da 'JurisAcademy'.\n\
         Objetivo: VENDER e CONVERTER interessados em alunos, tirando dúvidas de forma persuasiva.\n\
         \n\
         Nossos Cursos (Base de Conhecimento):\n",
    );
    for (i, course) in CATALOG.iter().enumerate() {
        instruction.push_str(&format!(
            "{}. {} (R$ {}, {}) - {}\n",
            i + 1,
            course.title,
            course.price_brl,
            course.level,
            course.focus,
        ));
    }
    instruction.push_str(
        "\n\
         Regras:\n\
         - Respostas curtas e objetivas (max 150 palavras).\n\
         - Use tom profissional mas acessível.\n\
         - Se não souber, peça para o aluno contatar o suporte humano.\n\
         - Não invente preços ou cursos fora desta lista.\n",
    );
    instruction
});

/// Reply served to the user when the model is unavailable after all attempts.
pub const FALLBACK_REPLY: &str =
    "Desculpe, estou com alta demanda no momento. Tente novamente em instantes.";

/// Reply served when the model returns an empty body.
pub const EMPTY_REPLY: &str = "Não consegui gerar uma resposta.";

/// Sampling temperature for every model call.
pub const TEMPERATURE: f32 = 0.7;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
