use crate::reaction::Reaction;

/// For each reaction, the reactions whose propensity has to be refreshed
/// after it fires. Every list starts with the reaction itself.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    dependents: Vec<Vec<usize>>,
}

impl DependencyGraph {
    pub fn build(n_species: usize, reactions: &[Reaction]) -> Self {
        // species -> reactions consuming it
        let mut triggers: Vec<Vec<usize>> = vec![Vec::new(); n_species];
        for (idx, reaction) in reactions.iter().enumerate() {
            for &species in reaction.reactants() {
                if triggers[species].last() != Some(&idx) {
                    triggers[species].push(idx);
                }
            }
        }

        let mut dependents = vec![Vec::new(); reactions.len()];
        let mut visit_markers = vec![0usize; reactions.len()];
        let mut stamp = 1usize;
        for (r, deps) in dependents.iter_mut().enumerate() {
            if stamp == usize::MAX {
                visit_markers.fill(0);
                stamp = 1;
            }
            let mark = stamp;
            stamp += 1;

            visit_markers[r] = mark;
            deps.push(r);
            for species in reactions[r].species() {
                for &dep in &triggers[species] {
                    if visit_markers[dep] != mark {
                        visit_markers[dep] = mark;
                        deps.push(dep);
                    }
                }
            }
        }
        Self { dependents }
    }

    pub fn dependents(&self, reaction: usize) -> &[usize] {
        &self.dependents[reaction]
    }

    pub fn len(&self) -> usize {
        self.dependents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }
}
