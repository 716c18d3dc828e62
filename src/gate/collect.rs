//! Candidate collection — find the network destinations an invocation names.
//!
//! Three invocation shapes reach the gate:
//! - a direct URL (web fetch tools): one candidate;
//! - a shell command: only scanned when it mentions a known network tool;
//! - a search query: scanned for embedded URLs.
//!
//! Shell commands are split into simple commands at unquoted separators and
//! each one is word-split with `shlex`, so quoting and backslashes are
//! removed the way the shell removes them before the tool sees its
//! arguments. The raw text is scanned for URLs as well; a destination seen
//! either way is checked.
//!
//! Scanning free text is best-effort. URL-looking tokens are found by
//! pattern, and a few tool families get extra handling for destinations that
//! are written without a scheme (`scp f user@host:`, `dig name.example`).
//! A destination written any other way without a scheme is not seen.

use crate::utils::paths::program_name;
use regex_lite::Regex;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::LazyLock;

/// Program names that move bytes across the network.
pub const BUILTIN_NETWORK_TOOLS: &[&str] = &[
    "curl", "wget", "nc", "ncat", "netcat", "socat", "ssh", "scp", "sftp", "rsync", "git",
    "ftp", "lftp", "telnet", "http", "https", "xh", "aria2c", "dig", "nslookup", "drill",
    "host",
];

/// Tools whose positional arguments are names to resolve.
const DNS_TOOLS: &[&str] = &["dig", "nslookup", "drill", "host"];

/// Tools that take `user@host[:path]` destinations.
const REMOTE_SHELL_TOOLS: &[&str] = &["ssh", "scp", "sftp", "rsync", "git"];

/// git subcommands whose positional arguments may be remotes.
const GIT_REMOTE_COMMANDS: &[&str] = &[
    "clone", "push", "pull", "fetch", "ls-remote", "remote", "submodule", "archive",
];

/// git global options that take a separate value.
const GIT_VALUE_OPTIONS: &[&str] = &["-C", "-c", "--git-dir", "--work-tree", "--namespace"];

/// Words that run another command, skipped when looking for the program.
const COMMAND_WRAPPERS: &[&str] = &[
    "sudo", "env", "command", "exec", "nohup", "time", "nice", "timeout", "xargs", "doas",
];

/// Characters that end a simple command when they appear unquoted.
const SEGMENT_SEPARATORS: &[char] = &['\n', ';', '|', '&', '(', ')', '`'];

/// Any scheme-prefixed token, up to whitespace, quotes, or shell metacharacters.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)[a-z][a-z0-9+.\-]*://[^\s'"<>|;&()`{}]+"#)
        .expect("URL pattern is valid")
});

/// An intercepted action, as described by the hook boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// A field that is itself a URL (web fetch).
    DirectUrl(String),
    /// A shell command line.
    FreeTextCommand(String),
    /// A web search query.
    QueryText(String),
}

impl Invocation {
    pub fn kind(&self) -> &'static str {
        match self {
            Invocation::DirectUrl(_) => "url",
            Invocation::FreeTextCommand(_) => "command",
            Invocation::QueryText(_) => "query",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Invocation::DirectUrl(text)
            | Invocation::FreeTextCommand(text)
            | Invocation::QueryText(text) => text,
        }
    }

    /// The candidates this invocation names, each distinct text once, in the
    /// order they were found.
    pub fn candidates<'a>(
        &'a self,
        tools: &'a NetworkTools,
    ) -> Box<dyn Iterator<Item = Candidate<'a>> + 'a> {
        match self {
            Invocation::DirectUrl(url) => {
                let url = url.trim();
                if url.is_empty() {
                    Box::new(std::iter::empty())
                } else {
                    Box::new(std::iter::once(Candidate::new(url, Source::Direct)))
                }
            }
            Invocation::FreeTextCommand(command) => {
                let segments = split_segments(command);
                if !segments.iter().any(|segment| segment.mentions(tools)) {
                    return Box::new(std::iter::empty());
                }
                let mut found: Vec<Candidate<'a>> = embedded_urls(command).collect();
                for segment in &segments {
                    found.extend(segment.destinations(tools));
                }
                let mut seen = HashSet::new();
                found.retain(|candidate| seen.insert(candidate.text.clone()));
                Box::new(found.into_iter())
            }
            Invocation::QueryText(query) => Box::new(embedded_urls(query)),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.text())
    }
}

/// Where in the invocation a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Direct,
    EmbeddedUrl,
    RemoteSpec,
    DnsName,
    /// Built by shell expansion, or not splittable into words; the host is
    /// only known at run time.
    Dynamic,
}

/// A text fragment believed to name a network destination. Borrowed from the
/// invocation when it appears there verbatim, owned when it only exists after
/// shell unquoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub text: Cow<'a, str>,
    pub source: Source,
}

impl<'a> Candidate<'a> {
    pub fn new(text: impl Into<Cow<'a, str>>, source: Source) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    fn into_owned<'b>(self) -> Candidate<'b> {
        Candidate::new(self.text.into_owned(), self.source)
    }
}

/// The set of program names treated as network tools.
#[derive(Debug, Clone)]
pub struct NetworkTools {
    names: BTreeSet<String>,
}

impl Default for NetworkTools {
    fn default() -> Self {
        Self::builtin()
    }
}

impl NetworkTools {
    pub fn builtin() -> Self {
        Self {
            names: BUILTIN_NETWORK_TOOLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The built-in set plus extra names (from configuration).
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tools = Self::builtin();
        for name in extra {
            let name = name.as_ref().trim().to_lowercase();
            if !name.is_empty() {
                tools.names.insert(name);
            }
        }
        tools
    }

    pub fn contains(&self, word: &str) -> bool {
        self.names.contains(&program_name(word).to_lowercase())
    }

    /// True when any whole word of `command`, after unquoting, is a network
    /// tool.
    pub fn mentioned_in(&self, command: &str) -> bool {
        split_segments(command)
            .iter()
            .any(|segment| segment.mentions(self))
    }
}

/// One simple command of a shell line.
#[derive(Debug)]
struct Segment<'a> {
    /// Raw text, without its terminating separator.
    body: &'a str,
    /// Terminated by `(` or a backtick: what follows is another command
    /// whose output may complete this one's arguments.
    opens_substitution: bool,
    /// Unquoted words, or None when the quoting does not balance.
    words: Option<Vec<String>>,
}

impl<'a> Segment<'a> {
    fn new(body: &'a str, opens_substitution: bool) -> Self {
        let words = shlex::split(body).map(|words| {
            words
                .iter()
                .flat_map(|word| word.split(['<', '>']))
                .filter(|word| !word.is_empty())
                .map(str::to_string)
                .collect()
        });
        Self {
            body,
            opens_substitution,
            words,
        }
    }

    fn mentions(&self, tools: &NetworkTools) -> bool {
        match &self.words {
            Some(words) => words.iter().any(|word| tools.contains(word)),
            None => loose_words(self.body).any(|word| tools.contains(&word)),
        }
    }

    fn destinations(&self, tools: &NetworkTools) -> Vec<Candidate<'a>> {
        let Some(words) = &self.words else {
            // Unbalanced quoting: the shell's reading of this command is
            // unknown, so its destination is too.
            return if self.mentions(tools) {
                vec![Candidate::new(self.body.trim(), Source::Dynamic)]
            } else {
                Vec::new()
            };
        };

        let mut found: Vec<Candidate<'a>> = words
            .iter()
            .flat_map(|word| embedded_urls(word).map(Candidate::into_owned))
            .collect();
        found.extend(bare_destinations(words, tools));

        // `dig $(...)` or `scp f `...``: the rest of the destination is the
        // output of another command.
        if self.opens_substitution && found_program(words, tools).is_some() {
            found.push(Candidate::new(self.body.trim(), Source::Dynamic));
        }
        found
    }
}

/// Split a command line at separators that are outside quotes and not
/// escaped.
fn split_segments(command: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in command.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('\''), _) => {}
            (_, '\\') => escaped = true,
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, c) if SEGMENT_SEPARATORS.contains(&c) => {
                segments.push(Segment::new(&command[start..i], c == '(' || c == '`'));
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    segments.push(Segment::new(&command[start..], false));
    segments
}

/// Whitespace-separated words with every quote and backslash dropped. Only
/// used to spot a tool name in text `shlex` cannot split.
fn loose_words(body: &str) -> impl Iterator<Item = String> + '_ {
    body.split_whitespace()
        .map(|word| word.chars().filter(|c| !matches!(c, '\'' | '"' | '\\')).collect())
}

/// URL-like substrings of free text. `file://` URLs name no remote host
/// and are skipped.
fn embedded_urls(text: &str) -> impl Iterator<Item = Candidate<'_>> + '_ {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|url| !url.get(..7).is_some_and(|s| s.eq_ignore_ascii_case("file://")))
        .map(|url| Candidate::new(url, source_for(url, Source::EmbeddedUrl)))
}

/// The network tool run by a simple command, and its arguments.
fn found_program<'w>(
    words: &'w [String],
    tools: &NetworkTools,
) -> Option<(String, &'w [String])> {
    let position = words.iter().position(|word| !is_command_prefix(word))?;
    let program = &words[position];
    if !tools.contains(program) {
        return None;
    }
    Some((program_name(program).to_lowercase(), &words[position + 1..]))
}

/// Destinations written without a scheme, for tools known to take them.
fn bare_destinations<'c>(words: &[String], tools: &NetworkTools) -> Vec<Candidate<'c>> {
    let Some((program, args)) = found_program(words, tools) else {
        return Vec::new();
    };
    let args = args.iter().map(String::as_str).filter(|word| !word.contains("://"));

    if DNS_TOOLS.contains(&program.as_str()) {
        args.filter_map(dns_name)
            .map(|name| Candidate::new(name.to_string(), source_for(name, Source::DnsName)))
            .collect()
    } else if REMOTE_SHELL_TOOLS.contains(&program.as_str()) {
        if program == "git" && !git_names_remote(args.clone()) {
            return Vec::new();
        }
        args.filter(|word| !word.starts_with('-'))
            .filter_map(remote_host)
            .map(|host| Candidate::new(host.to_string(), source_for(host, Source::RemoteSpec)))
            .collect()
    } else {
        Vec::new()
    }
}

/// A positional argument of a DNS tool that looks like a name to resolve.
fn dns_name(word: &str) -> Option<&str> {
    if word.starts_with('-') || word.starts_with('+') {
        return None;
    }
    let name = word.strip_prefix('@').unwrap_or(word);
    (name.contains('.') || is_expansion(name)).then_some(name)
}

/// Whether a git invocation runs a subcommand that talks to a remote.
fn git_names_remote<'w>(mut args: impl Iterator<Item = &'w str>) -> bool {
    while let Some(word) = args.next() {
        if GIT_VALUE_OPTIONS.contains(&word) {
            args.next();
        } else if !word.starts_with('-') {
            return GIT_REMOTE_COMMANDS.contains(&word);
        }
    }
    false
}

fn is_expansion(word: &str) -> bool {
    word.contains('$') || word.contains('`')
}

fn source_for(text: &str, source: Source) -> Source {
    if is_expansion(text) {
        Source::Dynamic
    } else {
        source
    }
}

/// Env assignments, wrappers, and the flags or durations given to wrappers.
fn is_command_prefix(word: &str) -> bool {
    (word.contains('=') && !word.starts_with('-'))
        || word.starts_with('-')
        || word
            .trim_end_matches(|c| matches!(c, 's' | 'm' | 'h' | 'd'))
            .parse::<f64>()
            .is_ok()
        || COMMAND_WRAPPERS.contains(&program_name(word))
}

/// The `user@host` or `host` part of an scp/rsync style remote spec.
fn remote_host(word: &str) -> Option<&str> {
    if let Some(at) = word.rfind('@') {
        let after = &word[at + 1..];
        let host_len = if after.starts_with('[') {
            after.find(']').map_or(after.len(), |i| i + 1)
        } else {
            after.find(':').unwrap_or(after.len())
        };
        return Some(&word[..at + 1 + host_len]);
    }
    let (host, _path) = word.split_once(':')?;
    if host.contains('.') && !host.contains('/') {
        Some(host)
    } else {
        None
    }
}
