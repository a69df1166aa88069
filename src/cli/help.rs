//! Topic help with examples and guidance beyond `--help`

use crate::config::env::EnvManager;
use colored::*;

/// One documented option in the configuration topic
struct OptionHelp {
    long: &'static str,
    value: &'static str,
    env: Option<&'static str>,
    description: &'static str,
}

const OPTIONS: &[OptionHelp] = &[
    OptionHelp { long: "hosts", value: "<HOSTS>", env: Some("HOSTS"), description: "Comma-separated hosts, pinged concurrently" },
    OptionHelp { long: "duration", value: "<SECONDS>", env: Some("DURATION"), description: "Length of the test window" },
    OptionHelp { long: "interval", value: "<SECONDS>", env: Some("INTERVAL"), description: "Time between sends to the same host" },
    OptionHelp { long: "packet-size", value: "<BYTES>", env: Some("PACKET_SIZE"), description: "ICMP payload length on the wire" },
    OptionHelp { long: "ttl", value: "<TTL>", env: Some("TTL"), description: "IPv4 time-to-live; ignored for IPv6 targets" },
    OptionHelp { long: "timeout", value: "<SECONDS>", env: Some("PROBE_TIMEOUT"), description: "How long each ping waits for its reply" },
    OptionHelp { long: "nolog", value: "", env: Some("ENABLE_LOG"), description: "Skip the CSV result log" },
    OptionHelp { long: "results-dir", value: "<DIR>", env: Some("RESULTS_DIR"), description: "Where CSV result logs are written" },
    OptionHelp { long: "no-plot", value: "", env: None, description: "Skip the latency chart" },
    OptionHelp { long: "log-level", value: "<LEVEL>", env: Some("LOG_LEVEL"), description: "Diagnostic log verbosity" },
    OptionHelp { long: "fail-on-unreachable", value: "", env: None, description: "Exit 2 if a host never replied" },
];

/// Topic help for the CLI application
pub struct HelpSystem {
    platform: &'static str,
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpSystem {
    pub const TOPICS: &'static [&'static str] = &["config", "env", "examples", "output", "permissions"];

    pub fn new() -> Self {
        Self {
            platform: std::env::consts::OS,
        }
    }

    /// Help text for `topic`, or None when the topic is unknown
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        let body = match topic.trim().to_lowercase().as_str() {
            "config" | "configuration" => self.format_configuration_help(use_colors),
            "env" | "environment" => EnvManager::display_env_help(),
            "examples" => self.format_examples_help(use_colors),
            "output" | "results" => self.format_output_help(use_colors),
            "permissions" | "privileges" => self.format_permissions_help(use_colors),
            _ => return None,
        };
        Some(format!("{}\n{}", self.format_header(use_colors), body))
    }

    fn format_header(&self, use_colors: bool) -> String {
        let title = "Network Connectivity Tester";
        let version = env!("CARGO_PKG_VERSION");
        if use_colors {
            format!(
                "{}\nVersion: {} | Platform: {}\n",
                title.bright_cyan().bold(),
                version.green(),
                self.platform.yellow()
            )
        } else {
            format!("{}\nVersion: {} | Platform: {}\n", title, version, self.platform)
        }
    }

    fn section(&self, title: &str, use_colors: bool) -> String {
        if use_colors {
            title.bright_green().bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn format_configuration_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", self.section("CONFIGURATION:", use_colors));
        for option in OPTIONS {
            let flag = format!("--{} {}", option.long, option.value);
            let flag = if use_colors {
                flag.trim_end().bright_white().to_string()
            } else {
                flag.trim_end().to_string()
            };
            help.push_str(&format!("  {}\n      {}", flag, option.description));
            if let Some(env) = option.env {
                help.push_str(&format!(" [env: {}]", env));
            }
            help.push('\n');
        }
        help.push_str("\nCommand-line flags override environment variables, which override .env values.\n");
        help
    }

    fn format_examples_help(&self, use_colors: bool) -> String {
        let examples = [
            ("Default run: 8.8.8.8 and 1.1.1.1 for 30 seconds", "nct"),
            ("Watch a gateway closely for ten minutes", "nct --hosts 192.168.1.1 --duration 600 --interval 0.2"),
            ("Quick check without files or chart", "nct --duration 5 --nolog --no-plot"),
            ("Large payloads with a short TTL", "nct --hosts example.com --packet-size 1400 --ttl 8"),
            ("Use in scripts: fail when a host is down", "nct --duration 10 --no-color --fail-on-unreachable"),
        ];

        let mut help = format!("{}\n", self.section("EXAMPLES:", use_colors));
        for (description, command) in examples {
            let command = if use_colors { command.bright_white().to_string() } else { command.to_string() };
            help.push_str(&format!("  # {}\n  {}\n\n", description, command));
        }
        help
    }

    fn format_output_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", self.section("OUTPUT:", use_colors));
        help.push_str("  Every ping prints one line as soon as it completes:\n");
        help.push_str("    Ping to <host>: Success (<ms> ms)\n");
        help.push_str("    Ping to <host> failed.\n");
        help.push_str("    Error pinging <host>: <cause>\n\n");
        help.push_str("  Unless --nolog is given, each ping is also appended to\n");
        help.push_str("  <results-dir>/<YYYY-MM-DD_HH-MM-SS>.csv as timestamp,host,status\n");
        help.push_str("  where status is 'Success (<ms> ms)' or 'Failed'.\n\n");
        help.push_str("  After the run a statistics table and, unless --no-plot is given,\n");
        help.push_str("  a latency chart with one series per host are printed.\n");
        help.push_str("  --verbose adds the per-host event log.\n");
        help
    }

    fn format_permissions_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", self.section("PERMISSIONS:", use_colors));
        help.push_str("  Sending ICMP echo requests needs a raw or ICMP datagram socket.\n");
        if self.platform == "linux" {
            help.push_str("  On Linux, either run with CAP_NET_RAW:\n");
            help.push_str("    sudo setcap cap_net_raw+ep $(which nct)\n");
            help.push_str("  or allow unprivileged ICMP sockets for your group:\n");
            help.push_str("    sudo sysctl -w net.ipv4.ping_group_range=\"0 2147483647\"\n");
        } else {
            help.push_str("  Run with administrator privileges if every ping reports an error.\n");
        }
        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_topic_renders() {
        let help = HelpSystem::new();
        for topic in HelpSystem::TOPICS {
            let text = help.display_topic_help(topic, false);
            assert!(text.is_some(), "topic {} missing", topic);
            assert!(text.unwrap().starts_with("Network Connectivity Tester"));
        }
    }

    #[test]
    fn test_unknown_topic() {
        assert!(HelpSystem::new().display_topic_help("dns", false).is_none());
    }

    #[test]
    fn test_configuration_help_mentions_env_names() {
        let text = HelpSystem::new().display_topic_help("config", false).unwrap();
        assert!(text.contains("--packet-size <BYTES>"));
        assert!(text.contains("[env: PROBE_TIMEOUT]"));
        assert!(text.contains("--no-plot"));
    }
}
