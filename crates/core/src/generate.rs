//! Venv spec generation
//!
//! Generation is a fixed sequence of named steps, each a pure mutation of
//! the spec. The sequence runs once per package build; ordering matters
//! only inside the install section, where the emitted commands run in
//! declaration order at build time.

use tracing::debug;
use venvrpm_schema::VenvConfig;

use crate::spec::PackageSpec;

/// Plugin name the host pipeline knows this extension by.
pub const EXTENSION_NAME: &str = "python_venv";

/// Human-readable description reported to the host.
pub const EXTENSION_DESCRIPTION: &str = "Packaging extension for Python virtualenvs";

/// Extension version reported to the host.
pub const EXTENSION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Override that deletes the automatic bytecode-compilation sub-hook from
/// the host's default post-install hook, leaving every other sub-hook
/// intact. Compiled bytecode would embed buildroot paths.
const OS_INSTALL_POST: &str = "%(echo '%{__os_install_post}' | sed -e 's!/usr/lib[^[:space:]]*/brp-python-bytecompile[[:space:]].*$!!g')";

type Step = fn(&VenvConfig, &mut PackageSpec);

/// Generation steps, applied in order
const STEPS: [(&str, Step); 8] = [
    ("build-id-links", build_id_links),
    ("venv-command", venv_command),
    ("install-paths", install_paths),
    ("post-install-overrides", post_install_overrides),
    ("dependency-tags", dependency_tags),
    ("prep-block", prep_block),
    ("files-block", files_block),
    ("install-block", install_block),
];

/// Generate the venv packaging content into `spec`
///
/// Pure text assembly over a validated config: no I/O, no failure modes.
/// The caller owns the spec; the same reference is returned so plugin
/// chains can pass it along.
pub fn generate<'a>(config: &VenvConfig, spec: &'a mut PackageSpec) -> &'a mut PackageSpec {
    for (name, step) in STEPS {
        debug!("Applying step {}", name);
        step(config, spec);
    }
    spec
}

/// Join `args` onto `base` with single spaces
///
/// An empty sequence yields `base` unchanged, with no trailing space.
fn join_args(base: &str, args: &[String]) -> String {
    if args.is_empty() {
        base.to_string()
    } else {
        format!("{} {}", base, args.join(" "))
    }
}

/// Venvs contain many binaries; build-ID links for them would pollute
/// the package, so suppress them outright.
fn build_id_links(_config: &VenvConfig, spec: &mut PackageSpec) {
    spec.set_macro("_build_id_links", "none");
}

fn venv_command(config: &VenvConfig, spec: &mut PackageSpec) {
    let cmd = match &config.source_venv {
        // Copy semantics win; cmd, flags, and python are ignored
        Some(source) => format!("cp -r {}", source),
        None => {
            let mut cmd = join_args(&config.cmd, &config.flags);
            if let Some(python) = &config.python {
                cmd = format!("{} --python={}", cmd, python);
            }
            cmd
        }
    };
    spec.set_macro("venv_cmd", cmd);
}

fn install_paths(config: &VenvConfig, spec: &mut PackageSpec) {
    spec.set_macro("venv_name", config.name.clone());
    spec.set_macro(
        "venv_install_dir",
        format!("{}/%{{venv_name}}", config.path),
    );
    spec.set_macro("venv_dir", "%{buildroot}/%{venv_install_dir}");
    spec.set_macro("venv_bin", "%{venv_dir}/bin");
    spec.set_macro("venv_python", "%{venv_bin}/python");
    spec.set_macro(
        "venv_pip",
        join_args("%{venv_python} %{venv_bin}/pip install", &config.pip_flags),
    );
}

fn post_install_overrides(_config: &VenvConfig, spec: &mut PackageSpec) {
    spec.set_macro("__prelink_undo_cmd", "%{nil}");
    spec.set_global("__os_install_post", OS_INSTALL_POST);
}

/// Shebangs inside the venv get rewritten to the target interpreter, so
/// automatic dependency scanning would record the embedded interpreter
/// and emit wrong requires/provides.
fn dependency_tags(_config: &VenvConfig, spec: &mut PackageSpec) {
    spec.set_tag("AutoReq", "No");
    spec.set_tag("AutoProv", "No");
    spec.set_tag("BuildRequires", "/usr/bin/pathfix.py");
}

fn prep_block(_config: &VenvConfig, spec: &mut PackageSpec) {
    spec.blocks
        .prep
        .push("mkdir -p %{buildroot}/%{venv_install_dir}".to_string());
}

/// The whole install tree is claimed as one entry; no per-file
/// enumeration.
fn files_block(_config: &VenvConfig, spec: &mut PackageSpec) {
    spec.blocks.files.push("/%{venv_install_dir}".to_string());
}

fn install_block(config: &VenvConfig, spec: &mut PackageSpec) {
    let install = &mut spec.blocks.install;

    // `cp -r` needs an existing parent; virtualenv makes its own target
    if config.source_venv.is_some() {
        install.push("mkdir -p `dirname %{venv_dir}`".to_string());
    }
    install.push("%{venv_cmd} %{venv_dir}".to_string());
    install.push("cd %{SOURCE0}".to_string());

    // Later files may override pins from earlier ones; keep the given order
    for requirement in &config.requirements {
        install.push(format!("%{{venv_pip}} -r %{{SOURCE0}}/{}", requirement));
    }

    install.extend([
        "cd %{SOURCE0}".to_string(),
        "%{venv_python} setup.py install".to_string(),
        "cd -".to_string(),
        // Wheel RECORD files carry buildroot-absolute paths and must not ship
        r#"find %{buildroot} -name "RECORD" -exec rm -rf {} \;"#.to_string(),
    ]);

    // Debug sections in native modules record buildroot paths
    if config.strip_binaries {
        install.push(
            r#"find %{venv_dir}/lib -type f -name "*.so" | xargs -r strip"#.to_string(),
        );
    }

    install.extend([
        // Symlinks (lib64 -> lib) may not survive the buildroot boundary;
        // replace each with a physical copy of its target
        "for link in `find %{venv_dir} -type l` ; do source=`readlink -f $link` ; unlink $link ; cp -r $source $link ; done".to_string(),
        // Rewrite generic `#!/usr/bin/env python` shebangs to the target
        // interpreter, restricted to .py scripts by name
        r#"pathfix.py -pni "%{__python3} %{py3_shbang_opts}" %{buildroot}/%{venv_install_dir} `grep -lr "^#!/usr/bin/env python$" %{buildroot}/%{venv_install_dir} | grep "\.py" | egrep "\-[^/]+$"`"#.to_string(),
    ]);
}
