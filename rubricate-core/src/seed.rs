//! Built-in starter catalog.
//!
//! Everything goes through the same builders and insert paths as user data,
//! so the seeded catalog satisfies the same invariants. Besides the four
//! starter domains it carries the full list of selectable evaluation
//! domains that the rubric templates are mapped to.

use serde_json::json;

use crate::catalog::MemoryCatalog;
use crate::error::RubricateError;
use crate::rubric::{CriterionSpec, RubricBuilder};
use crate::types::{Domain, DomainCategory, EvaluationDimension, NormalizationMethod, RubricType};
use crate::weight_config::WeightConfigBuilder;

pub const DOMAIN_GENERAL: &str = "domain_general";
pub const DOMAIN_CODING: &str = "domain_coding";
pub const DOMAIN_MATH: &str = "domain_math";
pub const DOMAIN_REASONING: &str = "domain_reasoning";

pub const RUBRIC_CODE_QUALITY: &str = "rubric_code_quality";
pub const RUBRIC_REASONING: &str = "rubric_reasoning";
pub const RUBRIC_ACCURACY: &str = "rubric_accuracy";

pub const CONFIG_CODE_FOCUS: &str = "weight_config_code_focus";
pub const CONFIG_BALANCED: &str = "weight_config_balanced";

/// Build the default catalog: the starter and selectable domains, three
/// rubrics, and two weight configurations.
pub fn default_catalog() -> Result<MemoryCatalog, RubricateError> {
    let mut catalog = MemoryCatalog::new();

    for domain in default_domains().into_iter().chain(catalog_domains()) {
        catalog.insert_domain(domain)?;
    }

    let code_quality = RubricBuilder::new(RubricType::CodeQuality, EvaluationDimension::ResponseQuality)
        .id(RUBRIC_CODE_QUALITY)
        .name("Code Quality")
        .domain(DOMAIN_CODING)
        .description("Evaluates code quality including correctness, style, and best practices")
        .instructions(
            "Evaluate the code based on syntax correctness, logical correctness, and code style.",
        )
        .criterion(
            CriterionSpec::new(
                "Syntax Correctness",
                "Code must be syntactically correct and executable",
                0.3,
            )
            .with_guidelines(["Check for syntax errors", "Verify imports are correct"]),
        )
        .criterion(
            CriterionSpec::new("Logical Correctness", "Code must solve the problem correctly", 0.4)
                .with_guidelines(["Test with sample inputs", "Check edge cases"]),
        )
        .criterion(
            CriterionSpec::new(
                "Code Style",
                "Code should follow best practices and style guidelines",
                0.3,
            )
            .with_guidelines(["Check naming conventions", "Verify documentation"]),
        )
        .build()?;

    let reasoning = RubricBuilder::new(RubricType::Reasoning, EvaluationDimension::ResponseQuality)
        .id(RUBRIC_REASONING)
        .name("Reasoning Ability")
        .domain(DOMAIN_REASONING)
        .description("Evaluates logical reasoning and problem-solving ability")
        .instructions("Evaluate the reasoning process and solution quality.")
        .criterion(
            CriterionSpec::new(
                "Logical Coherence",
                "Arguments and steps must be logically coherent",
                0.4,
            )
            .with_guidelines(["Check logical flow", "Verify step-by-step reasoning"]),
        )
        .criterion(
            CriterionSpec::new(
                "Problem Analysis",
                "Ability to correctly analyze and break down problems",
                0.3,
            )
            .with_guidelines(["Check problem understanding", "Verify approach"]),
        )
        .criterion(
            CriterionSpec::new("Solution Quality", "Quality and correctness of the solution", 0.3)
                .with_guidelines(["Verify solution correctness", "Check completeness"]),
        )
        .build()?;

    // Shared: no owning domain.
    let accuracy = RubricBuilder::new(RubricType::Accuracy, EvaluationDimension::ResponseQuality)
        .id(RUBRIC_ACCURACY)
        .name("Accuracy")
        .description("Evaluates factual accuracy and correctness")
        .instructions("Evaluate the accuracy, completeness, and relevance of the response.")
        .criterion(
            CriterionSpec::new("Factual Correctness", "Information must be factually correct", 0.5)
                .with_guidelines(["Verify facts", "Check against reference materials"]),
        )
        .criterion(
            CriterionSpec::new(
                "Completeness",
                "Response should be complete and comprehensive",
                0.3,
            )
            .with_guidelines(["Check if all aspects are covered"]),
        )
        .criterion(
            CriterionSpec::new("Relevance", "Response should be relevant to the query", 0.2)
                .with_guidelines(["Check relevance to the question"]),
        )
        .build()?;

    catalog.insert_rubric(code_quality)?;
    catalog.insert_rubric(reasoning)?;
    catalog.insert_rubric(accuracy)?;

    let code_focus = WeightConfigBuilder::new(NormalizationMethod::WeightedAverage)
        .id(CONFIG_CODE_FOCUS)
        .name("Code Quality Focus")
        .domain(DOMAIN_CODING)
        .description("Configuration emphasizing code quality metrics")
        .rubric(RUBRIC_CODE_QUALITY, 0.6)
        .rubric(RUBRIC_ACCURACY, 0.4)
        .build()?;

    let balanced = WeightConfigBuilder::new(NormalizationMethod::WeightedAverage)
        .id(CONFIG_BALANCED)
        .name("Balanced Evaluation")
        .description("Balanced configuration for general evaluation")
        .rubric(RUBRIC_ACCURACY, 0.5)
        .rubric(RUBRIC_REASONING, 0.5)
        .build()?;

    catalog.add_weight_config(code_focus)?;
    catalog.add_weight_config(balanced)?;

    Ok(catalog)
}

fn default_domains() -> Vec<Domain> {
    vec![
        Domain::new(DOMAIN_GENERAL, "General Purpose", DomainCategory::General)
            .with_description("General purpose LLM evaluation"),
        Domain::new(DOMAIN_CODING, "Code Generation", DomainCategory::Coding)
            .with_description("Evaluation for code generation tasks")
            .with_metadata("languages", json!(["python", "javascript", "java", "cpp"])),
        Domain::new(DOMAIN_MATH, "Mathematics", DomainCategory::Mathematics)
            .with_description("Mathematical problem solving evaluation")
            .with_metadata("levels", json!(["basic", "intermediate", "advanced"])),
        Domain::new(DOMAIN_REASONING, "Reasoning", DomainCategory::Reasoning)
            .with_description("Logical reasoning and problem solving"),
    ]
}

/// Selectable evaluation domains, grouped by category.
pub fn catalog_domains() -> impl Iterator<Item = Domain> {
    CATALOG_DOMAINS.iter().map(DomainEntry::to_domain)
}

struct DomainEntry {
    id: &'static str,
    name: &'static str,
    category: DomainCategory,
    description: &'static str,
    complexity: &'static str,
    use_cases: &'static [&'static str],
    /// Additional string metadata such as `language`, `level`, or `warning`.
    extra: &'static [(&'static str, &'static str)],
}

impl DomainEntry {
    fn to_domain(&self) -> Domain {
        let mut domain = Domain::new(self.id, self.name, self.category)
            .with_description(self.description)
            .with_metadata("complexity", json!(self.complexity))
            .with_metadata("use_cases", json!(self.use_cases));
        for (key, value) in self.extra {
            domain = domain.with_metadata(*key, json!(value));
        }
        domain
    }
}

const CATALOG_DOMAINS: &[DomainEntry] = &[
    DomainEntry {
        id: "domain_general_conversation",
        name: "General Conversation",
        category: DomainCategory::General,
        description: "Evaluation of general conversational abilities, context understanding, and natural dialogue",
        complexity: "medium",
        use_cases: &["chatbots", "assistants", "customer_service"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_qa_general",
        name: "General Question Answering",
        category: DomainCategory::General,
        description: "Evaluation of factual question answering across diverse topics",
        complexity: "low",
        use_cases: &["search", "knowledge_base", "information_retrieval"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_python_programming",
        name: "Python Programming",
        category: DomainCategory::Coding,
        description: "Evaluation of Python code generation, debugging, and software development tasks",
        complexity: "high",
        use_cases: &["code_generation", "debugging", "refactoring"],
        extra: &[("language", "python")],
    },
    DomainEntry {
        id: "domain_javascript_programming",
        name: "JavaScript Programming",
        category: DomainCategory::Coding,
        description: "Evaluation of JavaScript/TypeScript code generation for web and Node.js applications",
        complexity: "high",
        use_cases: &["web_development", "frontend", "backend"],
        extra: &[("language", "javascript")],
    },
    DomainEntry {
        id: "domain_java_programming",
        name: "Java Programming",
        category: DomainCategory::Coding,
        description: "Evaluation of Java code generation for enterprise and Android applications",
        complexity: "high",
        use_cases: &["enterprise", "android", "backend"],
        extra: &[("language", "java")],
    },
    DomainEntry {
        id: "domain_cpp_programming",
        name: "C++ Programming",
        category: DomainCategory::Coding,
        description: "Evaluation of C++ code generation for system programming and performance-critical applications",
        complexity: "very_high",
        use_cases: &["systems", "gaming", "embedded"],
        extra: &[("language", "cpp")],
    },
    DomainEntry {
        id: "domain_sql_database",
        name: "SQL & Database Queries",
        category: DomainCategory::Coding,
        description: "Evaluation of SQL query generation, optimization, and database design",
        complexity: "medium",
        use_cases: &["data_analysis", "backend", "reporting"],
        extra: &[("language", "sql")],
    },
    DomainEntry {
        id: "domain_algorithm_design",
        name: "Algorithm Design & Analysis",
        category: DomainCategory::Coding,
        description: "Evaluation of algorithm design, complexity analysis, and optimization",
        complexity: "very_high",
        use_cases: &["competitive_programming", "research", "optimization"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_code_review",
        name: "Code Review & Refactoring",
        category: DomainCategory::Coding,
        description: "Evaluation of code review capabilities, bug detection, and refactoring suggestions",
        complexity: "high",
        use_cases: &["quality_assurance", "maintenance", "best_practices"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_basic_mathematics",
        name: "Basic Mathematics",
        category: DomainCategory::Mathematics,
        description: "Evaluation of arithmetic, algebra, and basic mathematical problem solving",
        complexity: "low",
        use_cases: &["education", "calculations"],
        extra: &[("level", "basic")],
    },
    DomainEntry {
        id: "domain_advanced_mathematics",
        name: "Advanced Mathematics",
        category: DomainCategory::Mathematics,
        description: "Evaluation of calculus, linear algebra, differential equations, and advanced mathematical concepts",
        complexity: "very_high",
        use_cases: &["research", "engineering", "academia"],
        extra: &[("level", "advanced")],
    },
    DomainEntry {
        id: "domain_statistics_probability",
        name: "Statistics & Probability",
        category: DomainCategory::Mathematics,
        description: "Evaluation of statistical analysis, probability theory, and data interpretation",
        complexity: "high",
        use_cases: &["data_science", "research", "analytics"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_mathematical_proofs",
        name: "Mathematical Proofs",
        category: DomainCategory::Mathematics,
        description: "Evaluation of mathematical proof construction and logical reasoning",
        complexity: "very_high",
        use_cases: &["academia", "research", "theoretical_math"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_logical_reasoning",
        name: "Logical Reasoning",
        category: DomainCategory::Reasoning,
        description: "Evaluation of deductive and inductive reasoning, logical inference, and argument analysis",
        complexity: "high",
        use_cases: &["critical_thinking", "analysis", "decision_making"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_causal_reasoning",
        name: "Causal Reasoning",
        category: DomainCategory::Reasoning,
        description: "Evaluation of cause-and-effect understanding, causal chains, and counterfactual reasoning",
        complexity: "high",
        use_cases: &["explanation", "diagnosis", "planning"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_analytical_reasoning",
        name: "Analytical Reasoning",
        category: DomainCategory::Reasoning,
        description: "Evaluation of complex problem decomposition, pattern recognition, and analytical thinking",
        complexity: "very_high",
        use_cases: &["problem_solving", "strategy", "analysis"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_commonsense_reasoning",
        name: "Commonsense Reasoning",
        category: DomainCategory::Reasoning,
        description: "Evaluation of everyday knowledge, social understanding, and commonsense inference",
        complexity: "medium",
        use_cases: &["nlp", "conversation", "understanding"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_text_summarization",
        name: "Text Summarization",
        category: DomainCategory::Language,
        description: "Evaluation of extractive and abstractive text summarization capabilities",
        complexity: "medium",
        use_cases: &["content_creation", "research", "news"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_translation",
        name: "Translation",
        category: DomainCategory::Language,
        description: "Evaluation of machine translation quality across different language pairs",
        complexity: "high",
        use_cases: &["localization", "communication", "content"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_sentiment_analysis",
        name: "Sentiment Analysis",
        category: DomainCategory::Language,
        description: "Evaluation of emotion detection, sentiment classification, and tone analysis",
        complexity: "medium",
        use_cases: &["social_media", "customer_feedback", "market_research"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_text_classification",
        name: "Text Classification",
        category: DomainCategory::Language,
        description: "Evaluation of topic classification, intent detection, and text categorization",
        complexity: "medium",
        use_cases: &["content_moderation", "routing", "organization"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_named_entity_recognition",
        name: "Named Entity Recognition",
        category: DomainCategory::Language,
        description: "Evaluation of entity extraction, relationship identification, and information extraction",
        complexity: "medium",
        use_cases: &["knowledge_graphs", "search", "data_extraction"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_physics",
        name: "Physics",
        category: DomainCategory::Science,
        description: "Evaluation of physics problem solving, concept understanding, and scientific reasoning",
        complexity: "high",
        use_cases: &["education", "research", "engineering"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_chemistry",
        name: "Chemistry",
        category: DomainCategory::Science,
        description: "Evaluation of chemical reactions, molecular understanding, and chemistry problem solving",
        complexity: "high",
        use_cases: &["education", "research", "pharmaceuticals"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_biology",
        name: "Biology",
        category: DomainCategory::Science,
        description: "Evaluation of biological concepts, processes, and scientific knowledge",
        complexity: "medium",
        use_cases: &["education", "research", "medical"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_computer_science",
        name: "Computer Science Theory",
        category: DomainCategory::Science,
        description: "Evaluation of CS theory, data structures, computer architecture, and systems design",
        complexity: "very_high",
        use_cases: &["academia", "research", "system_design"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_business_analysis",
        name: "Business Analysis",
        category: DomainCategory::Business,
        description: "Evaluation of business strategy, market analysis, and decision-making frameworks",
        complexity: "high",
        use_cases: &["consulting", "strategy", "planning"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_financial_analysis",
        name: "Financial Analysis",
        category: DomainCategory::Business,
        description: "Evaluation of financial modeling, risk assessment, and economic analysis",
        complexity: "high",
        use_cases: &["finance", "investment", "accounting"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_marketing",
        name: "Marketing & Advertising",
        category: DomainCategory::Business,
        description: "Evaluation of marketing strategy, content creation, and campaign planning",
        complexity: "medium",
        use_cases: &["advertising", "content", "strategy"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_medical_qa",
        name: "Medical Question Answering",
        category: DomainCategory::Medical,
        description: "Evaluation of medical knowledge, diagnosis support, and healthcare information",
        complexity: "very_high",
        use_cases: &["healthcare", "education", "research"],
        extra: &[("warning", "Not for actual medical diagnosis")],
    },
    DomainEntry {
        id: "domain_clinical_reasoning",
        name: "Clinical Reasoning",
        category: DomainCategory::Medical,
        description: "Evaluation of clinical decision-making, symptom analysis, and treatment planning",
        complexity: "very_high",
        use_cases: &["education", "training", "research"],
        extra: &[("warning", "Educational purposes only")],
    },
    DomainEntry {
        id: "domain_legal_analysis",
        name: "Legal Analysis",
        category: DomainCategory::Legal,
        description: "Evaluation of legal reasoning, case analysis, and contract interpretation",
        complexity: "very_high",
        use_cases: &["research", "education", "analysis"],
        extra: &[("warning", "Not legal advice")],
    },
    DomainEntry {
        id: "domain_contract_review",
        name: "Contract Review",
        category: DomainCategory::Legal,
        description: "Evaluation of contract analysis, clause identification, and risk assessment",
        complexity: "very_high",
        use_cases: &["compliance", "review", "analysis"],
        extra: &[("warning", "Requires professional review")],
    },
    DomainEntry {
        id: "domain_educational_content",
        name: "Educational Content Creation",
        category: DomainCategory::Education,
        description: "Evaluation of lesson planning, educational material generation, and pedagogical content",
        complexity: "medium",
        use_cases: &["teaching", "curriculum", "learning"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_tutoring",
        name: "Tutoring & Explanation",
        category: DomainCategory::Education,
        description: "Evaluation of explanatory capabilities, step-by-step instruction, and concept clarification",
        complexity: "medium",
        use_cases: &["learning", "support", "guidance"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_creative_writing",
        name: "Creative Writing",
        category: DomainCategory::Creative,
        description: "Evaluation of storytelling, narrative generation, and creative content creation",
        complexity: "medium",
        use_cases: &["content", "entertainment", "art"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_poetry",
        name: "Poetry & Literary Arts",
        category: DomainCategory::Creative,
        description: "Evaluation of poetic composition, literary style, and artistic expression",
        complexity: "medium",
        use_cases: &["art", "entertainment", "expression"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_script_writing",
        name: "Script & Screenplay Writing",
        category: DomainCategory::Creative,
        description: "Evaluation of script generation, dialogue writing, and screenplay formatting",
        complexity: "high",
        use_cases: &["entertainment", "media", "content"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_system_design",
        name: "System Design",
        category: DomainCategory::Technical,
        description: "Evaluation of architecture design, scalability planning, and technical system solutions",
        complexity: "very_high",
        use_cases: &["engineering", "architecture", "planning"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_api_design",
        name: "API Design & Documentation",
        category: DomainCategory::Technical,
        description: "Evaluation of API design, documentation quality, and developer experience",
        complexity: "high",
        use_cases: &["development", "integration", "documentation"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_devops",
        name: "DevOps & Infrastructure",
        category: DomainCategory::Technical,
        description: "Evaluation of infrastructure as code, CI/CD pipelines, and deployment strategies",
        complexity: "high",
        use_cases: &["operations", "automation", "deployment"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_research_synthesis",
        name: "Research Synthesis",
        category: DomainCategory::Research,
        description: "Evaluation of literature review, research summarization, and academic writing",
        complexity: "very_high",
        use_cases: &["academia", "research", "publication"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_hypothesis_generation",
        name: "Hypothesis Generation",
        category: DomainCategory::Research,
        description: "Evaluation of research question formulation, hypothesis development, and experimental design",
        complexity: "very_high",
        use_cases: &["research", "academia", "innovation"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_social_media",
        name: "Social Media Content",
        category: DomainCategory::Social,
        description: "Evaluation of social media post generation, engagement optimization, and platform-specific content",
        complexity: "low",
        use_cases: &["marketing", "engagement", "content"],
        extra: &[],
    },
    DomainEntry {
        id: "domain_customer_service",
        name: "Customer Service",
        category: DomainCategory::Social,
        description: "Evaluation of customer interaction, problem resolution, and service quality",
        complexity: "medium",
        use_cases: &["support", "satisfaction", "retention"],
        extra: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, RubricFilter};
    use crate::normalize::is_normalized;

    #[test]
    fn test_default_catalog_contents() {
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.domains(None).len(), 4 + 45);
        assert_eq!(catalog.rubrics(&RubricFilter::default()).len(), 3);
        assert_eq!(catalog.weight_configs(None).len(), 2);
    }

    #[test]
    fn test_seeded_rubrics_are_normalized() {
        let catalog = default_catalog().unwrap();
        for rubric in catalog.rubrics(&RubricFilter::default()) {
            assert!(is_normalized(rubric.weights().values()), "{}", rubric.id);
            rubric.validate().unwrap();
        }
    }

    #[test]
    fn test_accuracy_is_shared() {
        let catalog = default_catalog().unwrap();
        let accuracy = catalog.rubric(RUBRIC_ACCURACY).unwrap();
        assert!(accuracy.domain_id.is_none());
        for domain in [DOMAIN_CODING, DOMAIN_MATH, DOMAIN_REASONING] {
            assert!(
                catalog
                    .rubrics_for_domain(domain)
                    .iter()
                    .any(|r| r.id == RUBRIC_ACCURACY)
            );
        }
    }

    #[test]
    fn test_code_focus_weights() {
        let catalog = default_catalog().unwrap();
        let config = catalog.weight_config(CONFIG_CODE_FOCUS).unwrap();
        assert_eq!(config.domain_id.as_deref(), Some(DOMAIN_CODING));
        assert!((config.weight(RUBRIC_CODE_QUALITY).unwrap() - 0.6).abs() < 1e-9);
        assert!((config.weight(RUBRIC_ACCURACY).unwrap() - 0.4).abs() < 1e-9);

        let balanced = catalog.weight_config(CONFIG_BALANCED).unwrap();
        assert!(balanced.domain_id.is_none());
        assert!((balanced.weight(RUBRIC_REASONING).unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_coding_domain_metadata() {
        let catalog = default_catalog().unwrap();
        let coding = catalog.domain(DOMAIN_CODING).unwrap();
        assert_eq!(coding.metadata["languages"][0], "python");
    }

    #[test]
    fn test_template_domains_exist_in_catalog() {
        let catalog = default_catalog().unwrap();
        for domain_id in crate::templates::mapped_domain_ids() {
            assert!(catalog.domain(domain_id).is_some(), "{domain_id} missing");
        }
    }

    #[test]
    fn test_search_and_category_cover_selectable_domains() {
        let catalog = default_catalog().unwrap();
        let hits: Vec<&str> = catalog
            .search_domains("python")
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(hits, vec!["domain_python_programming"]);

        let legal = catalog.domains(Some(DomainCategory::Legal));
        assert_eq!(legal.len(), 2);
        assert_eq!(legal[0].metadata["warning"], "Not legal advice");
        assert_eq!(legal[0].metadata["complexity"], "very_high");
    }

    #[test]
    fn test_selectable_domain_metadata() {
        let catalog = default_catalog().unwrap();
        let python = catalog.domain("domain_python_programming").unwrap();
        assert_eq!(python.category, DomainCategory::Coding);
        assert_eq!(python.metadata["language"], "python");
        assert_eq!(python.metadata["use_cases"][1], "debugging");
    }
}
