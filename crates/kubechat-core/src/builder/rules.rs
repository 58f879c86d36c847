use super::state::BuilderState;

// ---------------------------------------------------------------------------
// Facts
// ---------------------------------------------------------------------------

/// What the pipeline knows before deciding how much of the builder to show.
pub struct Facts<'a> {
    pub state: &'a BuilderState,
    /// Resource types valid for the selected verb.
    pub types: &'a [String],
}

/// How many dropdowns the message discloses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disclosure {
    /// Verb dropdown plus preview; the verb takes no resource.
    VerbOnly,
    /// Verb and resource type dropdowns, no preview.
    TypeSelection,
    /// Every dropdown plus preview.
    Full,
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

pub struct Rule {
    pub id: &'static str,
    pub condition: fn(&Facts) -> bool,
    pub disclosure: Disclosure,
    pub apply: fn(BuilderState) -> BuilderState,
}

fn keep(state: BuilderState) -> BuilderState {
    state
}

pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "verb-without-resources",
            condition: |f| f.types.is_empty(),
            disclosure: Disclosure::VerbOnly,
            apply: BuilderState::without_resource,
        },
        Rule {
            id: "resource-type-not-selected",
            condition: |f| !f.types.iter().any(|t| *t == f.state.resource_type),
            disclosure: Disclosure::TypeSelection,
            apply: keep,
        },
    ]
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Ordered rules; the first matching rule decides, [`Disclosure::Full`] otherwise.
pub struct Pipeline {
    rules: Vec<Rule>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Pipeline {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, state: BuilderState, types: &[String]) -> (Disclosure, BuilderState) {
        let facts = Facts {
            state: &state,
            types,
        };
        let matched = self.rules.iter().find(|r| (r.condition)(&facts));
        match matched {
            Some(rule) => {
                tracing::debug!(rule = rule.id, "builder rule matched");
                (rule.disclosure, (rule.apply)(state))
            }
            None => (Disclosure::Full, state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(ty: &str) -> BuilderState {
        BuilderState {
            verb: "get".to_string(),
            resource_type: ty.to_string(),
            resource_name: "api-0".to_string(),
            namespace: "team-a".to_string(),
            ..Default::default()
        }
    }

    fn types() -> Vec<String> {
        vec!["deployments".to_string(), "pods".to_string()]
    }

    #[test]
    fn no_types_clears_resource_fields() {
        let (d, s) = Pipeline::default().classify(state("pods"), &[]);
        assert_eq!(d, Disclosure::VerbOnly);
        assert!(s.resource_type.is_empty());
        assert!(s.resource_name.is_empty());
        assert!(s.namespace.is_empty());
        assert_eq!(s.verb, "get");
    }

    #[test]
    fn stale_type_asks_for_type_selection() {
        let (d, s) = Pipeline::default().classify(state("secrets"), &types());
        assert_eq!(d, Disclosure::TypeSelection);
        assert_eq!(s.resource_type, "secrets");
    }

    #[test]
    fn empty_type_asks_for_type_selection() {
        let (d, _) = Pipeline::default().classify(state(""), &types());
        assert_eq!(d, Disclosure::TypeSelection);
    }

    #[test]
    fn valid_type_falls_through_to_full() {
        let (d, s) = Pipeline::default().classify(state("pods"), &types());
        assert_eq!(d, Disclosure::Full);
        assert_eq!(s, state("pods"));
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = vec![
            Rule {
                id: "always",
                condition: |_| true,
                disclosure: Disclosure::TypeSelection,
                apply: keep,
            },
            Rule {
                id: "never-reached",
                condition: |_| true,
                disclosure: Disclosure::VerbOnly,
                apply: BuilderState::without_resource,
            },
        ];
        let (d, s) = Pipeline::new(rules).classify(state("pods"), &[]);
        assert_eq!(d, Disclosure::TypeSelection);
        assert_eq!(s.resource_type, "pods");
    }
}
