//! File: source.rs
//! Splits a single `.shader` asset into its vertex and fragment sources.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The token that opens a section marker line
pub const SECTION_MARKER: &str = "#shader";

/// The two programmable stages a `.shader` asset can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    /// The word that follows `#shader` to select this stage
    pub fn keyword(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    /// Works out which stage a marker line selects, looking only at the text after the marker.
    /// `vertex` wins if a line somehow names both.
    fn from_marker_tail(tail: &str) -> Option<Self> {
        Self::ALL.iter()
            .copied()
            .find(|stage| tail.contains(stage.keyword()))
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The vertex and fragment sources pulled out of one asset. Either one may be empty if the asset
/// never opened that section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSourcePair {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSourcePair {
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }

    fn stage_mut(&mut self, stage: ShaderStage) -> &mut String {
        match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        }
    }

    /// True when both stages have some source
    pub fn is_complete(&self) -> bool {
        !self.vertex.is_empty() && !self.fragment.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not read shader asset {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads the asset at `path` and splits it. The file is read fresh on every call.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ShaderSourcePair, SourceError> {
    let path = path.as_ref();
    let read_error = |source| SourceError::Read { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(read_error)?;
    let pair = parse_reader(BufReader::new(file)).map_err(read_error)?;

    debug!(
        "Parsed {}: {} bytes of vertex source, {} bytes of fragment source",
        path.display(), pair.vertex.len(), pair.fragment.len()
    );

    Ok(pair)
}

/// Splits in-memory shader text. This can't fail since there's nothing to read.
pub fn parse_source(text: &str) -> ShaderSourcePair {
    let mut splitter = Splitter::default();
    for line in text.lines() {
        splitter.feed(line);
    }
    splitter.finish()
}

/// Splits shader text coming from any buffered reader, line by line
pub fn parse_reader<R: BufRead>(reader: R) -> io::Result<ShaderSourcePair> {
    let mut splitter = Splitter::default();
    for line in reader.lines() {
        splitter.feed(&line?);
    }
    Ok(splitter.finish())
}

/// The line-at-a-time state behind all the parse functions
#[derive(Default)]
struct Splitter {
    current: Option<ShaderStage>,
    pair: ShaderSourcePair,
    dropped: usize,
}

impl Splitter {
    fn feed(&mut self, line: &str) {
        if let Some(at) = line.find(SECTION_MARKER) {
            let tail = &line[at + SECTION_MARKER.len()..];
            if let Some(stage) = ShaderStage::from_marker_tail(tail) {
                self.current = Some(stage);
                return;
            }

            warn!("Unrecognised shader section marker {:?}; keeping it as source", line);
        }

        match self.current {
            Some(stage) => {
                let buf = self.pair.stage_mut(stage);
                buf.push_str(line);
                buf.push('\n');
            }
            // Nothing selected yet
            None => self.dropped += 1,
        }
    }

    fn finish(self) -> ShaderSourcePair {
        if self.dropped > 0 {
            debug!("Dropped {} line(s) preceding the first section marker", self.dropped);
        }
        self.pair
    }
}
