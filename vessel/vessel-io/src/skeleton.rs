//! Readers and writers for the TreeSkeleton2014 text formats.

// File counts arrive as i64 and become usize once validated positive.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};
use vessel_repair::{RepairParams, correct_connectivity};
use vessel_types::{Branch, VesselNode, VesselTree};

use crate::error::{IoError, IoResult};

const HEADER_INTERNAL: &str = "@TreeSkeleton2014_Internal";
const HEADER_SIMPLE: &str = "@TreeSkeleton2014_Simple";

/// The two TreeSkeleton2014 file layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeFormat {
    /// Shared node table plus branches as index lists. Lossless.
    Internal,
    /// Branches with inlined node records; shared endpoints are
    /// duplicated and re-welded on load.
    Simple,
}

impl TreeFormat {
    /// Integer tag used by the original tooling (0 internal, 1 simple).
    #[must_use]
    pub const fn tag(self) -> u32 {
        match self {
            Self::Internal => 0,
            Self::Simple => 1,
        }
    }

    /// Format for an integer tag, `None` if unassigned.
    #[must_use]
    pub const fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::Internal),
            1 => Some(Self::Simple),
            _ => None,
        }
    }

    const fn header(self) -> &'static str {
        match self {
            Self::Internal => HEADER_INTERNAL,
            Self::Simple => HEADER_SIMPLE,
        }
    }
}

/// Saves a tree to a skeleton file.
///
/// # Errors
///
/// [`IoError::Io`] when the file cannot be created or written.
pub fn save_tree<P: AsRef<Path>>(path: P, tree: &VesselTree, format: TreeFormat) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_tree(&mut writer, tree, format)?;
    writer.flush()?;
    info!(
        path = %path.as_ref().display(),
        nodes = tree.node_count(),
        branches = tree.branch_count(),
        ?format,
        "Saved skeleton"
    );
    Ok(())
}

/// Writes a tree to `writer` in the given format.
///
/// # Errors
///
/// [`IoError::Io`] when the writer fails.
pub fn write_tree<W: Write>(writer: &mut W, tree: &VesselTree, format: TreeFormat) -> IoResult<()> {
    writeln!(writer, "{}", format.header())?;
    match format {
        TreeFormat::Internal => {
            writeln!(writer, "@NumberOfAllNodes {}", tree.node_count())?;
            for node in &tree.nodes {
                write_node(writer, node)?;
            }
            writeln!(writer, "@NumberOfBranches {}", tree.branch_count())?;
            for branch in &tree.branches {
                write!(writer, "\t{}", branch.len())?;
                for &index in &branch.nodes {
                    write!(writer, " {index}")?;
                }
                writeln!(writer)?;
            }
        }
        TreeFormat::Simple => {
            writeln!(writer, "@NumberOfBranches {}", tree.branch_count())?;
            for branch in &tree.branches {
                writeln!(writer, "@NumberOfNodes {}", branch.len())?;
                for &index in &branch.nodes {
                    if let Some(node) = tree.node(index) {
                        write_node(writer, node)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn write_node<W: Write>(writer: &mut W, node: &VesselNode) -> IoResult<()> {
    writeln!(
        writer,
        "\t{} {} {} {} {}",
        node.position.x, node.position.y, node.position.z, node.degree, node.radius
    )?;
    Ok(())
}

/// Loads a tree from a skeleton file, auto-detecting the format from
/// the header.
///
/// # Errors
///
/// [`IoError::Io`] when the file cannot be opened or read, and any
/// parse error from [`read_tree`].
pub fn load_tree<P: AsRef<Path>>(path: P) -> IoResult<VesselTree> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    let tree = read_tree(&mut reader)?;
    info!(
        path = %path.as_ref().display(),
        nodes = tree.node_count(),
        branches = tree.branch_count(),
        "Loaded skeleton"
    );
    Ok(tree)
}

/// Reads a tree from `reader`, auto-detecting the format from the
/// header.
///
/// Both formats finish with a connectivity correction pass that welds
/// duplicated endpoints and recomputes degrees. A tree the pass cannot
/// repair still loads; a tree that cannot be parsed does not.
///
/// # Errors
///
/// [`IoError::Io`] when the reader fails, [`IoError::UnknownHeader`]
/// for an unrecognized first token, and token-level errors for
/// malformed content.
pub fn read_tree<R: Read>(reader: &mut R) -> IoResult<VesselTree> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut tokens = Tokens::new(&text);

    let header = tokens.next("header")?;
    let mut tree = match header {
        HEADER_INTERNAL => read_internal(&mut tokens),
        HEADER_SIMPLE => read_simple(&mut tokens),
        other => Err(IoError::UnknownHeader {
            found: other.to_owned(),
        }),
    }?;

    if let Err(error) = correct_connectivity(&mut tree, &RepairParams::default()) {
        debug!(%error, "post-load connectivity pass failed, keeping tree as parsed");
    }
    Ok(tree)
}

fn read_internal(tokens: &mut Tokens<'_>) -> IoResult<VesselTree> {
    tokens.keyword("@NumberOfAllNodes")?;
    let node_count = tokens.count("node")?;
    let mut tree = VesselTree::with_capacity(node_count, 0);
    for _ in 0..node_count {
        tree.nodes.push(read_node(tokens)?);
    }

    tokens.keyword("@NumberOfBranches")?;
    let branch_count = tokens.count("branch")?;
    for _ in 0..branch_count {
        let len = tokens.count("branch node")?;
        let mut indices = Vec::with_capacity(len);
        for _ in 0..len {
            let index: u32 = tokens.next("node index")?.parse()?;
            if index as usize >= node_count {
                return Err(IoError::NodeIndex {
                    index,
                    count: node_count,
                });
            }
            indices.push(index);
        }
        tree.branches.push(Branch::from_indices(indices));
    }
    Ok(tree)
}

fn read_simple(tokens: &mut Tokens<'_>) -> IoResult<VesselTree> {
    tokens.keyword("@NumberOfBranches")?;
    let branch_count = tokens.count("branch")?;
    let mut tree = VesselTree::new();
    for _ in 0..branch_count {
        tokens.keyword("@NumberOfNodes")?;
        let len = tokens.count("branch node")?;
        let mut path = Vec::with_capacity(len);
        for _ in 0..len {
            path.push(read_node(tokens)?);
        }
        // len > 0 is already guaranteed, add_branch cannot fail
        let _ = tree.add_branch(path);
    }
    Ok(tree)
}

fn read_node(tokens: &mut Tokens<'_>) -> IoResult<VesselNode> {
    let x: f64 = tokens.next("node x")?.parse()?;
    let y: f64 = tokens.next("node y")?.parse()?;
    let z: f64 = tokens.next("node z")?.parse()?;
    let degree: u32 = tokens.next("node degree")?.parse()?;
    let radius: f64 = tokens.next("node radius")?.parse()?;
    let mut node = VesselNode::from_coords(x, y, z).with_radius(radius);
    node.degree = degree;
    Ok(node)
}

/// Whitespace tokenizer over the whole file, matching the original
/// stream-extraction reader: line structure carries no meaning.
struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    fn next(&mut self, reading: &'static str) -> IoResult<&'a str> {
        self.inner
            .next()
            .ok_or(IoError::UnexpectedEof { reading })
    }

    fn keyword(&mut self, expected: &'static str) -> IoResult<()> {
        let found = self.next(expected)?;
        if found == expected {
            Ok(())
        } else {
            Err(IoError::UnexpectedToken {
                expected,
                found: found.to_owned(),
            })
        }
    }

    fn count(&mut self, field: &'static str) -> IoResult<usize> {
        let value: i64 = self.next(field)?.parse()?;
        if value <= 0 {
            return Err(IoError::InvalidCount { field, value });
        }
        Ok(value as usize)
    }
}
