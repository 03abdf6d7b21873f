use itertools::Itertools;
use std::collections::HashMap;

use crate::content::{Cloud, ContentStore, Difficulty};
use crate::settings::{Role, Seniority};

/// What the pool can offer for one cloud; the settings form clamps against this
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudAvailability {
    pub cloud: Cloud,
    pub total_questions: usize,
    pub questions_by_difficulty: HashMap<Difficulty, usize>,
    pub code_snippets: usize,
    pub roles: Vec<Role>,
    pub seniorities: Vec<Seniority>,
    pub max_questions: usize,
    pub max_code_snippets: usize,
}

impl CloudAvailability {
    pub fn for_cloud(store: &ContentStore, cloud: Cloud) -> Self {
        let questions_by_difficulty = store
            .questions()
            .iter()
            .filter(|q| q.cloud == cloud)
            .counts_by(|q| q.difficulty);
        let total_questions = questions_by_difficulty.values().sum();
        let code_snippets = store.snippets().iter().filter(|s| s.cloud == cloud).count();

        let has = |d: Difficulty| questions_by_difficulty.get(&d).copied().unwrap_or(0) > 0;
        let (easy, medium, hard, expert) = (
            has(Difficulty::Easy),
            has(Difficulty::Medium),
            has(Difficulty::Hard),
            has(Difficulty::Expert),
        );

        let mut seniorities = Vec::new();
        if easy {
            seniorities.push(Seniority::Junior);
        }
        if easy || medium {
            seniorities.push(Seniority::Advanced);
        }
        if medium || hard {
            seniorities.push(Seniority::Senior);
        }
        if hard || expert {
            seniorities.push(Seniority::Specialist);
        }
        if seniorities.is_empty() {
            seniorities.push(Seniority::Junior);
        }

        let mut roles = vec![Role::Consultant];
        if code_snippets > 0 {
            roles.insert(0, Role::Developer);
        }

        Self {
            cloud,
            total_questions,
            max_questions: (total_questions * 4 / 5).max(1),
            max_code_snippets: code_snippets,
            code_snippets,
            questions_by_difficulty,
            roles,
            seniorities,
        }
    }

    /// Availability for every cloud, in display order
    pub fn all(store: &ContentStore) -> Vec<Self> {
        Cloud::all()
            .iter()
            .map(|&cloud| Self::for_cloud(store, cloud))
            .collect()
    }

    pub fn questions_at(&self, difficulty: Difficulty) -> usize {
        self.questions_by_difficulty
            .get(&difficulty)
            .copied()
            .unwrap_or(0)
    }

    pub fn supports_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn supports_seniority(&self, seniority: Seniority) -> bool {
        self.seniorities.contains(&seniority)
    }
}
