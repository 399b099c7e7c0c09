//! Standard rubric templates and the domain → template mapping.
//!
//! Templates are static data. Instantiating one for a domain runs it through
//! [`RubricBuilder`], producing a rubric with id `<domain_id>_<key>`.

use serde_json::json;

use crate::error::ScoringError;
use crate::rubric::{CriterionSpec, Rubric, RubricBuilder, ScoringScale};
use crate::types::{EvaluationDimension, RubricType};

/// Template keys used for domains without an explicit mapping.
pub const DEFAULT_TEMPLATE_KEYS: &[&str] = &["reasoning", "problem_solving", "clarity_completeness"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateCriterion {
    pub name: &'static str,
    pub description: &'static str,
    pub weight: f64,
    pub guidelines: &'static [&'static str],
}

/// A reusable rubric definition not yet bound to a domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RubricTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub rubric_type: RubricType,
    pub description: &'static str,
    pub instructions: &'static str,
    pub criteria: &'static [TemplateCriterion],
}

impl RubricTemplate {
    /// Bind the template to `domain_id`.
    pub fn instantiate(&self, domain_id: &str, scale: ScoringScale) -> Result<Rubric, ScoringError> {
        RubricBuilder::new(self.rubric_type, EvaluationDimension::ResponseQuality)
            .id(format!("{domain_id}_{}", self.key))
            .name(self.name)
            .domain(domain_id)
            .description(self.description)
            .instructions(self.instructions)
            .scale(scale)
            .metadata("rubric_key", json!(self.key))
            .metadata("is_standard", json!(true))
            .criteria(self.criteria.iter().map(|c| {
                CriterionSpec::new(c.name, c.description, c.weight)
                    .with_guidelines(c.guidelines.iter().copied())
            }))
            .build()
    }
}

/// Look up a standard template by key.
pub fn template(key: &str) -> Option<&'static RubricTemplate> {
    STANDARD_TEMPLATES.iter().find(|t| t.key == key)
}

/// Template keys mapped to `domain_id`, or [`DEFAULT_TEMPLATE_KEYS`].
pub fn template_keys_for_domain(domain_id: &str) -> &'static [&'static str] {
    DOMAIN_TEMPLATES
        .iter()
        .find(|(id, _)| *id == domain_id)
        .map(|(_, keys)| *keys)
        .unwrap_or(DEFAULT_TEMPLATE_KEYS)
}

/// Domains with an explicit template mapping.
pub fn mapped_domain_ids() -> impl Iterator<Item = &'static str> {
    DOMAIN_TEMPLATES.iter().map(|(id, _)| *id)
}

/// Instantiate the standard rubrics for `domain_id` on the default scale.
pub fn rubrics_for_domain(domain_id: &str) -> Result<Vec<Rubric>, ScoringError> {
    rubrics_for_domain_with_scale(domain_id, ScoringScale::default())
}

/// Instantiate the standard rubrics for `domain_id`. Mapped keys without a
/// template are skipped.
pub fn rubrics_for_domain_with_scale(
    domain_id: &str,
    scale: ScoringScale,
) -> Result<Vec<Rubric>, ScoringError> {
    let mut rubrics = Vec::new();
    for key in template_keys_for_domain(domain_id) {
        match template(key) {
            Some(t) => rubrics.push(t.instantiate(domain_id, scale)?),
            None => tracing::warn!(domain_id, key, "No rubric template for mapped key, skipping"),
        }
    }
    Ok(rubrics)
}

pub const STANDARD_TEMPLATES: &[RubricTemplate] = &[
    RubricTemplate {
        key: "reasoning",
        name: "Reasoning Quality",
        rubric_type: RubricType::Reasoning,
        description: "Evaluates the logical reasoning, inference quality, and argumentation structure",
        instructions: "Evaluate the reasoning quality by assessing logical consistency, inference validity, argument structure, and critical thinking depth.",
        criteria: &[
            TemplateCriterion {
                name: "Logical Consistency",
                description: "The response demonstrates consistent logical flow without contradictions",
                weight: 0.25,
                guidelines: &["Check for logical contradictions", "Verify argument coherence", "Assess reasoning chain validity"],
            },
            TemplateCriterion {
                name: "Inference Quality",
                description: "The response makes appropriate inferences from given information",
                weight: 0.25,
                guidelines: &["Evaluate inference validity", "Check for unsupported conclusions", "Assess evidence utilization"],
            },
            TemplateCriterion {
                name: "Argument Structure",
                description: "The response presents well-structured arguments with clear premises and conclusions",
                weight: 0.25,
                guidelines: &["Assess argument organization", "Check premise-conclusion relationships", "Evaluate argument completeness"],
            },
            TemplateCriterion {
                name: "Critical Thinking",
                description: "The response demonstrates critical analysis and consideration of alternatives",
                weight: 0.25,
                guidelines: &["Check for alternative consideration", "Assess bias recognition", "Evaluate analytical depth"],
            },
        ],
    },
    RubricTemplate {
        key: "problem_solving",
        name: "Problem Solving",
        rubric_type: RubricType::Accuracy,
        description: "Evaluates problem decomposition, solution approach, and problem-solving effectiveness",
        instructions: "Evaluate problem-solving capabilities by assessing problem understanding, solution approach, decomposition quality, and solution correctness.",
        criteria: &[
            TemplateCriterion {
                name: "Problem Understanding",
                description: "The response demonstrates clear understanding of the problem requirements",
                weight: 0.2,
                guidelines: &["Check problem comprehension", "Verify requirement identification", "Assess constraint recognition"],
            },
            TemplateCriterion {
                name: "Solution Approach",
                description: "The response presents an appropriate and effective solution strategy",
                weight: 0.3,
                guidelines: &["Evaluate approach appropriateness", "Check methodology selection", "Assess strategy effectiveness"],
            },
            TemplateCriterion {
                name: "Problem Decomposition",
                description: "The response breaks down complex problems into manageable components",
                weight: 0.2,
                guidelines: &["Assess decomposition quality", "Check sub-problem identification", "Evaluate complexity management"],
            },
            TemplateCriterion {
                name: "Solution Correctness",
                description: "The solution correctly addresses the problem and produces valid results",
                weight: 0.3,
                guidelines: &["Verify solution accuracy", "Check result validity", "Assess completeness"],
            },
        ],
    },
    RubricTemplate {
        key: "coding_software_development",
        name: "Coding and Software Development",
        rubric_type: RubricType::CodeQuality,
        description: "Evaluates code quality, best practices, and software development standards",
        instructions: "Evaluate code quality by assessing syntax correctness, functional correctness, code quality standards, performance, and documentation.",
        criteria: &[
            TemplateCriterion {
                name: "Syntax Correctness",
                description: "The code is syntactically correct and follows language conventions",
                weight: 0.2,
                guidelines: &["Check for syntax errors", "Verify language conventions", "Assess code structure"],
            },
            TemplateCriterion {
                name: "Functional Correctness",
                description: "The code correctly implements the required functionality",
                weight: 0.3,
                guidelines: &["Test with sample inputs", "Verify edge case handling", "Check output correctness"],
            },
            TemplateCriterion {
                name: "Code Quality",
                description: "The code follows best practices, is readable, and maintainable",
                weight: 0.25,
                guidelines: &["Check naming conventions", "Assess code organization", "Evaluate maintainability"],
            },
            TemplateCriterion {
                name: "Performance & Efficiency",
                description: "The code demonstrates efficient algorithms and optimal resource usage",
                weight: 0.15,
                guidelines: &["Assess time complexity", "Check space efficiency", "Evaluate optimization"],
            },
            TemplateCriterion {
                name: "Documentation & Comments",
                description: "The code includes appropriate documentation and comments",
                weight: 0.1,
                guidelines: &["Check code comments", "Assess documentation quality", "Evaluate clarity"],
            },
        ],
    },
    RubricTemplate {
        key: "content_generation",
        name: "Content Generation",
        rubric_type: RubricType::Creativity,
        description: "Evaluates content quality, creativity, engagement, and appropriateness",
        instructions: "Evaluate content generation by assessing quality, relevance, creativity, completeness, and engagement.",
        criteria: &[
            TemplateCriterion {
                name: "Content Quality",
                description: "The content is well-written, coherent, and of high quality",
                weight: 0.25,
                guidelines: &["Assess writing quality", "Check coherence and flow", "Evaluate language proficiency"],
            },
            TemplateCriterion {
                name: "Relevance & Appropriateness",
                description: "The content is relevant to the request and appropriate for the context",
                weight: 0.25,
                guidelines: &["Check topic relevance", "Assess context appropriateness", "Evaluate audience fit"],
            },
            TemplateCriterion {
                name: "Creativity & Originality",
                description: "The content demonstrates creativity, originality, and unique perspectives",
                weight: 0.2,
                guidelines: &["Assess originality", "Check creative elements", "Evaluate uniqueness"],
            },
            TemplateCriterion {
                name: "Completeness",
                description: "The content fully addresses the request and provides comprehensive coverage",
                weight: 0.15,
                guidelines: &["Check request fulfillment", "Assess coverage completeness", "Evaluate depth"],
            },
            TemplateCriterion {
                name: "Engagement & Clarity",
                description: "The content is engaging, clear, and easy to understand",
                weight: 0.15,
                guidelines: &["Assess readability", "Check engagement level", "Evaluate clarity"],
            },
        ],
    },
    RubricTemplate {
        key: "information_retrieval",
        name: "Information Retrieval",
        rubric_type: RubricType::Relevance,
        description: "Evaluates information retrieval accuracy, relevance, and completeness",
        instructions: "Evaluate information retrieval by assessing relevance, accuracy, completeness, and precision of retrieved information.",
        criteria: &[
            TemplateCriterion {
                name: "Relevance",
                description: "The retrieved information is highly relevant to the query",
                weight: 0.3,
                guidelines: &["Check query-information match", "Assess topical relevance", "Evaluate information appropriateness"],
            },
            TemplateCriterion {
                name: "Accuracy",
                description: "The retrieved information is factually accurate and reliable",
                weight: 0.3,
                guidelines: &["Verify factual correctness", "Check source reliability", "Assess information validity"],
            },
            TemplateCriterion {
                name: "Completeness",
                description: "The retrieval covers all relevant aspects of the query",
                weight: 0.2,
                guidelines: &["Check coverage breadth", "Assess information depth", "Evaluate comprehensiveness"],
            },
            TemplateCriterion {
                name: "Precision",
                description: "The retrieval minimizes irrelevant information and focuses on key points",
                weight: 0.2,
                guidelines: &["Check noise reduction", "Assess focus quality", "Evaluate precision"],
            },
        ],
    },
    RubricTemplate {
        key: "mathematical_correctness",
        name: "Mathematical Correctness",
        rubric_type: RubricType::MathematicalCorrectness,
        description: "Evaluates mathematical accuracy, calculation correctness, and mathematical reasoning",
        instructions: "Evaluate mathematical correctness by assessing calculation accuracy, reasoning quality, method selection, and solution presentation.",
        criteria: &[
            TemplateCriterion {
                name: "Calculation Accuracy",
                description: "Mathematical calculations are correct and accurate",
                weight: 0.35,
                guidelines: &["Verify calculation steps", "Check arithmetic accuracy", "Assess computational correctness"],
            },
            TemplateCriterion {
                name: "Mathematical Reasoning",
                description: "The mathematical reasoning and logic are sound",
                weight: 0.3,
                guidelines: &["Check reasoning validity", "Assess logical flow", "Evaluate proof quality"],
            },
            TemplateCriterion {
                name: "Method Selection",
                description: "Appropriate mathematical methods and techniques are selected",
                weight: 0.2,
                guidelines: &["Check method appropriateness", "Assess technique selection", "Evaluate approach quality"],
            },
            TemplateCriterion {
                name: "Solution Presentation",
                description: "The solution is clearly presented with proper notation and explanation",
                weight: 0.15,
                guidelines: &["Check notation clarity", "Assess explanation quality", "Evaluate presentation"],
            },
        ],
    },
    RubricTemplate {
        key: "clarity_completeness",
        name: "Clarity and Completeness",
        rubric_type: RubricType::Clarity,
        description: "Evaluates response clarity, completeness, and comprehensiveness",
        instructions: "Evaluate clarity and completeness by assessing response clarity, completeness, and organization.",
        criteria: &[
            TemplateCriterion {
                name: "Clarity",
                description: "The response is clear, well-structured, and easy to understand",
                weight: 0.35,
                guidelines: &["Assess language clarity", "Check structure quality", "Evaluate comprehensibility"],
            },
            TemplateCriterion {
                name: "Completeness",
                description: "The response fully addresses all aspects of the request",
                weight: 0.35,
                guidelines: &["Check request fulfillment", "Assess coverage breadth", "Evaluate depth"],
            },
            TemplateCriterion {
                name: "Organization",
                description: "The response is well-organized with logical flow and structure",
                weight: 0.3,
                guidelines: &["Check organization quality", "Assess logical flow", "Evaluate structure"],
            },
        ],
    },
    RubricTemplate {
        key: "factual_correctness",
        name: "Factual Correctness",
        rubric_type: RubricType::FactualCorrectness,
        description: "Evaluates factual accuracy, truthfulness, and information reliability",
        instructions: "Evaluate factual correctness by assessing accuracy, source reliability, and error avoidance.",
        criteria: &[
            TemplateCriterion {
                name: "Factual Accuracy",
                description: "All factual claims are accurate and verifiable",
                weight: 0.4,
                guidelines: &["Verify factual claims", "Check information accuracy", "Assess truthfulness"],
            },
            TemplateCriterion {
                name: "Source Reliability",
                description: "Information is drawn from reliable and credible sources",
                weight: 0.3,
                guidelines: &["Check source credibility", "Assess information reliability", "Evaluate source quality"],
            },
            TemplateCriterion {
                name: "Error Avoidance",
                description: "The response avoids factual errors, misconceptions, and misinformation",
                weight: 0.3,
                guidelines: &["Check for errors", "Assess misconception presence", "Evaluate misinformation"],
            },
        ],
    },
];

const DOMAIN_TEMPLATES: &[(&str, &[&str])] = &[
    ("domain_general_conversation", &["reasoning", "content_generation", "clarity_completeness", "factual_correctness"]),
    ("domain_qa_general", &["information_retrieval", "factual_correctness", "clarity_completeness", "reasoning"]),
    ("domain_python_programming", &["coding_software_development", "problem_solving", "reasoning", "clarity_completeness"]),
    ("domain_javascript_programming", &["coding_software_development", "problem_solving", "reasoning", "clarity_completeness"]),
    ("domain_java_programming", &["coding_software_development", "problem_solving", "reasoning", "clarity_completeness"]),
    ("domain_cpp_programming", &["coding_software_development", "problem_solving", "reasoning", "clarity_completeness"]),
    ("domain_sql_database", &["coding_software_development", "problem_solving", "reasoning", "information_retrieval"]),
    ("domain_algorithm_design", &["coding_software_development", "problem_solving", "reasoning", "mathematical_correctness"]),
    ("domain_code_review", &["coding_software_development", "reasoning", "clarity_completeness", "problem_solving"]),
    ("domain_basic_mathematics", &["mathematical_correctness", "problem_solving", "reasoning", "clarity_completeness"]),
    ("domain_advanced_mathematics", &["mathematical_correctness", "problem_solving", "reasoning", "clarity_completeness"]),
    ("domain_statistics_probability", &["mathematical_correctness", "problem_solving", "reasoning", "information_retrieval"]),
    ("domain_mathematical_proofs", &["mathematical_correctness", "reasoning", "clarity_completeness", "problem_solving"]),
    ("domain_logical_reasoning", &["reasoning", "problem_solving", "clarity_completeness", "factual_correctness"]),
    ("domain_causal_reasoning", &["reasoning", "problem_solving", "clarity_completeness", "factual_correctness"]),
    ("domain_analytical_reasoning", &["reasoning", "problem_solving", "clarity_completeness", "information_retrieval"]),
    ("domain_commonsense_reasoning", &["reasoning", "factual_correctness", "clarity_completeness", "content_generation"]),
    ("domain_text_summarization", &["content_generation", "information_retrieval", "clarity_completeness", "factual_correctness"]),
    ("domain_translation", &["content_generation", "clarity_completeness", "factual_correctness", "information_retrieval"]),
    ("domain_sentiment_analysis", &["information_retrieval", "reasoning", "factual_correctness", "clarity_completeness"]),
    ("domain_text_classification", &["information_retrieval", "reasoning", "factual_correctness", "clarity_completeness"]),
    ("domain_named_entity_recognition", &["information_retrieval", "factual_correctness", "clarity_completeness", "reasoning"]),
    ("domain_physics", &["mathematical_correctness", "problem_solving", "reasoning", "factual_correctness"]),
    ("domain_chemistry", &["factual_correctness", "problem_solving", "reasoning", "mathematical_correctness"]),
    ("domain_biology", &["factual_correctness", "information_retrieval", "reasoning", "clarity_completeness"]),
    ("domain_computer_science", &["coding_software_development", "problem_solving", "reasoning", "clarity_completeness"]),
    ("domain_business_analysis", &["reasoning", "problem_solving", "information_retrieval", "clarity_completeness"]),
    ("domain_financial_analysis", &["mathematical_correctness", "reasoning", "factual_correctness", "problem_solving"]),
    ("domain_marketing", &["content_generation", "reasoning", "clarity_completeness", "information_retrieval"]),
    ("domain_medical_qa", &["factual_correctness", "reasoning", "information_retrieval", "clarity_completeness"]),
    ("domain_clinical_reasoning", &["reasoning", "problem_solving", "factual_correctness", "information_retrieval"]),
    ("domain_legal_analysis", &["reasoning", "factual_correctness", "information_retrieval", "clarity_completeness"]),
    ("domain_contract_review", &["information_retrieval", "reasoning", "clarity_completeness", "factual_correctness"]),
    ("domain_educational_content", &["content_generation", "clarity_completeness", "factual_correctness", "information_retrieval"]),
    ("domain_tutoring", &["clarity_completeness", "reasoning", "content_generation", "factual_correctness"]),
    ("domain_creative_writing", &["content_generation", "clarity_completeness", "reasoning", "creativity"]),
    ("domain_poetry", &["content_generation", "creativity", "clarity_completeness", "reasoning"]),
    ("domain_script_writing", &["content_generation", "clarity_completeness", "reasoning", "creativity"]),
    ("domain_system_design", &["problem_solving", "reasoning", "clarity_completeness", "coding_software_development"]),
    ("domain_api_design", &["coding_software_development", "clarity_completeness", "reasoning", "problem_solving"]),
    ("domain_devops", &["coding_software_development", "problem_solving", "reasoning", "clarity_completeness"]),
    ("domain_research_synthesis", &["information_retrieval", "factual_correctness", "clarity_completeness", "reasoning"]),
    ("domain_hypothesis_generation", &["reasoning", "problem_solving", "clarity_completeness", "content_generation"]),
    ("domain_social_media", &["content_generation", "clarity_completeness", "information_retrieval", "reasoning"]),
    ("domain_customer_service", &["content_generation", "clarity_completeness", "reasoning", "information_retrieval"]),
];
