//! Loaded reaction network and the text format it is read from.
//!
//! ```text
//! 2 1 2 5          n_species n_reactions n_displays horizon
//! 100 0            initial counts
//! S0 S1            displayed species
//! S0 ->1.0 S1      one line per reaction
//! ```
//!
//! Reaction sides are empty, `S<k>`, `2S<k>` or `S<a> + S<b>`, and the rate
//! constant is glued to the arrow. Labels may be 0-based (`S0..S{n-1}`) or
//! 1-based (`S1..S{n}`). The numbering is read off the labels used anywhere in
//! the file, displays included: `S0` means 0-based, `S{n}` means 1-based. A
//! file that uses both, or neither, is rejected rather than guessed at.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::dependency::DependencyGraph;
use crate::error::SimError;
use crate::reaction::Reaction;

#[derive(Clone, Debug)]
pub struct Network {
    reactions: Vec<Reaction>,
    dependencies: DependencyGraph,
    initial_counts: Vec<i64>,
    displays: Vec<usize>,
    horizon: f64,
}

impl Network {
    /// Validates species indices against `initial_counts` and builds the
    /// dependency graph.
    pub fn new(
        initial_counts: Vec<i64>,
        reactions: Vec<Reaction>,
        displays: Vec<usize>,
        horizon: f64,
    ) -> Result<Self, SimError> {
        let n_species = initial_counts.len();
        if reactions.is_empty() {
            return Err(SimError::InvalidArgument(
                "network must contain at least one reaction".into(),
            ));
        }
        if !horizon.is_finite() || horizon < 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "horizon must be a finite non-negative number, got {horizon}"
            )));
        }
        if let Some(count) = initial_counts.iter().find(|&&c| c < 0) {
            return Err(SimError::InvalidArgument(format!(
                "initial counts must be non-negative, got {count}"
            )));
        }
        for (idx, reaction) in reactions.iter().enumerate() {
            if let Some(species) = reaction.species().find(|&s| s >= n_species) {
                return Err(SimError::InvalidArgument(format!(
                    "reaction {idx} refers to species {species} but only {n_species} exist"
                )));
            }
        }
        if let Some(&species) = displays.iter().find(|&&s| s >= n_species) {
            return Err(SimError::InvalidArgument(format!(
                "displayed species {species} exceeds number of species {n_species}"
            )));
        }
        let dependencies = DependencyGraph::build(n_species, &reactions);
        Ok(Self {
            reactions,
            dependencies,
            initial_counts,
            displays,
            horizon,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading network definition");
        fs::read_to_string(path)?.parse()
    }

    pub fn n_species(&self) -> usize {
        self.initial_counts.len()
    }

    pub fn n_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn reaction(&self, idx: usize) -> &Reaction {
        &self.reactions[idx]
    }

    pub fn dependencies(&self) -> &DependencyGraph {
        &self.dependencies
    }

    pub fn dependents(&self, reaction: usize) -> &[usize] {
        self.dependencies.dependents(reaction)
    }

    pub fn initial_counts(&self) -> &[i64] {
        &self.initial_counts
    }

    pub fn displays(&self) -> &[usize] {
        &self.displays
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }
}

impl FromStr for Network {
    type Err = SimError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = text.lines().enumerate().map(|(idx, line)| (idx + 1, line));
        let mut next_line = |what: &str| {
            lines
                .next()
                .ok_or_else(|| SimError::parse(0, format!("missing {what} line")))
        };

        let (header_no, header) = next_line("header")?;
        let header: Vec<&str> = header.split_whitespace().collect();
        if header.len() != 4 {
            return Err(SimError::parse(
                header_no,
                "header must read `n_species n_reactions n_displays horizon`",
            ));
        }
        let n_species: usize = parse_number(header_no, header[0], "species count")?;
        let n_reactions: usize = parse_number(header_no, header[1], "reaction count")?;
        let n_displays: usize = parse_number(header_no, header[2], "display count")?;
        let horizon: f64 = parse_number(header_no, header[3], "horizon")?;

        let (counts_no, counts_line) = next_line("initial counts")?;
        let counts = counts_line
            .split_whitespace()
            .map(|token| parse_number::<i64>(counts_no, token, "initial count"))
            .collect::<Result<Vec<_>, _>>()?;
        if counts.len() != n_species {
            return Err(SimError::parse(
                counts_no,
                format!("expected {n_species} initial counts, found {}", counts.len()),
            ));
        }

        let (displays_no, displays_line) = next_line("displayed species")?;
        let display_labels = displays_line
            .split_whitespace()
            .map(|token| parse_label(displays_no, token))
            .collect::<Result<Vec<_>, _>>()?;
        if display_labels.len() != n_displays {
            return Err(SimError::parse(
                displays_no,
                format!(
                    "expected {n_displays} displayed species, found {}",
                    display_labels.len()
                ),
            ));
        }

        let mut raw_reactions = Vec::with_capacity(n_reactions);
        for _ in 0..n_reactions {
            let (line_no, line) = next_line("reaction")?;
            raw_reactions.push((line_no, parse_reaction_line(line_no, line)?));
        }
        if let Some((line_no, _)) = lines.find(|(_, line)| !line.trim().is_empty()) {
            return Err(SimError::parse(
                line_no,
                format!("unexpected content after {n_reactions} reactions"),
            ));
        }

        let labels: Vec<usize> = raw_reactions
            .iter()
            .flat_map(|(_, raw)| raw.reactants.iter().chain(raw.products.iter()))
            .chain(display_labels.iter())
            .copied()
            .collect();
        let base = label_base(header_no, n_species, &labels)?;
        let resolve = |line_no: usize, label: usize| -> Result<usize, SimError> {
            label
                .checked_sub(base)
                .filter(|&idx| idx < n_species)
                .ok_or_else(|| {
                    SimError::parse(
                        line_no,
                        format!("species S{label} is outside the {n_species} declared species"),
                    )
                })
        };

        let mut reactions = Vec::with_capacity(n_reactions);
        for (line_no, raw) in raw_reactions {
            let reactants = raw
                .reactants
                .iter()
                .map(|&label| resolve(line_no, label))
                .collect::<Result<Vec<_>, _>>()?;
            let products = raw
                .products
                .iter()
                .map(|&label| resolve(line_no, label))
                .collect::<Result<Vec<_>, _>>()?;
            let reaction = Reaction::new(raw.rate, reactants, products)
                .map_err(|err| SimError::parse(line_no, err.to_string()))?;
            reactions.push(reaction);
        }
        let displays = display_labels
            .into_iter()
            .map(|label| resolve(displays_no, label))
            .collect::<Result<Vec<_>, _>>()?;

        Network::new(counts, reactions, displays, horizon)
    }
}

struct RawReaction {
    rate: f64,
    reactants: Vec<usize>,
    products: Vec<usize>,
}

/// 0 when `S0` appears, 1 when `S{n_species}` appears. Using both cannot fit
/// the declared species; using neither leaves the numbering undecided.
fn label_base(line_no: usize, n_species: usize, labels: &[usize]) -> Result<usize, SimError> {
    let zero_based = labels.contains(&0);
    let one_based = labels.contains(&n_species);
    match (zero_based, one_based) {
        (true, false) => Ok(0),
        (false, true) => Ok(1),
        (true, true) => Err(SimError::parse(
            line_no,
            format!("labels S0 and S{n_species} cannot both name one of {n_species} species"),
        )),
        (false, false) => Err(SimError::parse(
            line_no,
            format!(
                "cannot tell whether labels are 0- or 1-based; \
                 mention S0 or S{n_species} in a reaction or the display line"
            ),
        )),
    }
}

fn parse_reaction_line(line_no: usize, line: &str) -> Result<RawReaction, SimError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let arrow = tokens
        .iter()
        .position(|token| token.starts_with("->"))
        .ok_or_else(|| SimError::parse(line_no, "reaction is missing `->RATE`"))?;
    let (rate_token, rhs_start) = match &tokens[arrow][2..] {
        "" => (
            *tokens
                .get(arrow + 1)
                .ok_or_else(|| SimError::parse(line_no, "reaction is missing its rate"))?,
            arrow + 2,
        ),
        glued => (glued, arrow + 1),
    };
    let rate: f64 = parse_number(line_no, rate_token, "rate constant")?;
    Ok(RawReaction {
        rate,
        reactants: parse_side(line_no, &tokens[..arrow])?,
        products: parse_side(line_no, tokens.get(rhs_start..).unwrap_or(&[]))?,
    })
}

fn parse_side(line_no: usize, tokens: &[&str]) -> Result<Vec<usize>, SimError> {
    match *tokens {
        [] => Ok(Vec::new()),
        [single] => match single.strip_prefix('2') {
            Some(rest) if rest.starts_with(['S', 's']) => {
                let label = parse_label(line_no, rest)?;
                Ok(vec![label, label])
            }
            _ => Ok(vec![parse_label(line_no, single)?]),
        },
        [a, "+", b] => Ok(vec![parse_label(line_no, a)?, parse_label(line_no, b)?]),
        _ => Err(SimError::parse(
            line_no,
            format!("cannot read reaction side `{}`", tokens.join(" ")),
        )),
    }
}

fn parse_label(line_no: usize, token: &str) -> Result<usize, SimError> {
    let digits = token
        .strip_prefix('S')
        .or_else(|| token.strip_prefix('s'))
        .unwrap_or(token);
    digits
        .parse()
        .map_err(|_| SimError::parse(line_no, format!("invalid species label `{token}`")))
}

fn parse_number<T: FromStr>(line_no: usize, token: &str, what: &str) -> Result<T, SimError> {
    token
        .parse()
        .map_err(|_| SimError::parse(line_no, format!("invalid {what} `{token}`")))
}
