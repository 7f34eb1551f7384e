use crate::parser::ModalityParser;
use crate::signal::{Intent, Modality, PartialSignal};

/// What a text rule contributes when one of its keywords is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEffect {
    /// Sets the intent; the summary is always the verbatim input text.
    Intent {
        domain: String,
        target_users: Option<String>,
    },
    Functional(String),
    Constraint(String),
    Output(String),
}

/// A keyword rule: fires when any keyword occurs in the lower-cased text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRule {
    pub keywords: Vec<String>,
    pub effect: RuleEffect,
}

impl TextRule {
    pub fn new<I, S>(keywords: I, effect: RuleEffect) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            // Matching happens against lower-cased input.
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
            effect,
        }
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// The built-in rule table.
pub fn default_rules() -> Vec<TextRule> {
    vec![
        TextRule::new(
            ["app", "system", "website", "platform", "tool"],
            RuleEffect::Intent {
                domain: "software".to_string(),
                target_users: Some("general".to_string()),
            },
        ),
        TextRule::new(["track"], RuleEffect::Functional("Track user data".to_string())),
        TextRule::new(["report"], RuleEffect::Functional("Generate reports".to_string())),
        TextRule::new(["mobile"], RuleEffect::Constraint("Mobile platform".to_string())),
        TextRule::new(["dashboard"], RuleEffect::Output("Dashboard UI".to_string())),
    ]
}

/// Keyword-driven parser for free text.
#[derive(Debug, Clone)]
pub struct TextParser {
    rules: Vec<TextRule>,
}

impl Default for TextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TextParser {
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    /// A parser driven entirely by `rules`.
    pub fn with_rules(rules: Vec<TextRule>) -> Self {
        Self { rules }
    }

    /// Appends a rule after the existing ones.
    pub fn push_rule(mut self, rule: TextRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[TextRule] {
        &self.rules
    }
}

impl ModalityParser for TextParser {
    type Input = str;

    fn modality(&self) -> Modality {
        Modality::Text
    }

    fn parse(&self, text: &str) -> PartialSignal {
        let lowered = text.to_lowercase();
        let mut signal = PartialSignal::default();

        for rule in self.rules.iter().filter(|r| r.matches(&lowered)) {
            log::debug!("Text rule {:?} fired", rule.keywords);
            match &rule.effect {
                RuleEffect::Intent {
                    domain,
                    target_users,
                } => {
                    // Earlier intent rules take precedence.
                    if signal.intent.is_none() {
                        signal.intent = Some(Intent {
                            summary: text.to_string(),
                            domain: domain.clone(),
                            target_users: target_users.clone(),
                        });
                    }
                }
                RuleEffect::Functional(value) => signal.functional.push(value.clone()),
                RuleEffect::Constraint(value) => signal.constraints.push(value.clone()),
                RuleEffect::Output(value) => signal.outputs.push(value.clone()),
            }
        }

        signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_fire_independently() {
        let text = "Build a mobile APP to Track expenses with a dashboard and monthly reports";
        let signal = TextParser::new().parse(text);

        let intent = signal.intent.unwrap();
        assert_eq!(intent.summary, text);
        assert_eq!(intent.domain, "software");
        assert_eq!(intent.target_users.as_deref(), Some("general"));
        assert_eq!(signal.functional, vec!["Track user data", "Generate reports"]);
        assert_eq!(signal.constraints, vec!["Mobile platform"]);
        assert_eq!(signal.outputs, vec!["Dashboard UI"]);
    }

    #[test]
    fn test_no_rule_yields_empty_signal() {
        let signal = TextParser::new().parse("Hello there, nice weather");
        assert!(signal.is_empty());
    }

    #[test]
    fn test_fragments_without_intent() {
        let signal = TextParser::new().parse("mobile dashboard please");
        assert!(signal.intent.is_none());
        assert_eq!(signal.constraints, vec!["Mobile platform"]);
        assert_eq!(signal.outputs, vec!["Dashboard UI"]);
    }

    #[test]
    fn test_keywords_match_inside_words() {
        // "happy" contains "app", "reporting" contains "report".
        let signal = TextParser::new().parse("happy reporting");
        assert!(signal.intent.is_some());
        assert_eq!(signal.functional, vec!["Generate reports"]);
    }

    #[test]
    fn test_custom_rules_extend_the_table() {
        let parser = TextParser::new().push_rule(TextRule::new(
            ["Offline"],
            RuleEffect::Constraint("Works offline".to_string()),
        ));
        let signal = parser.parse("An offline-first tool");

        assert_eq!(parser.rules().len(), 6);
        assert_eq!(signal.constraints, vec!["Works offline"]);
    }

    #[test]
    fn test_first_intent_rule_wins() {
        let parser = TextParser::with_rules(vec![
            TextRule::new(
                ["game"],
                RuleEffect::Intent {
                    domain: "games".to_string(),
                    target_users: None,
                },
            ),
            TextRule::new(
                ["platform"],
                RuleEffect::Intent {
                    domain: "software".to_string(),
                    target_users: None,
                },
            ),
        ]);
        let signal = parser.parse("a platform game");
        assert_eq!(signal.intent.unwrap().domain, "games");
    }
}
