//! sbatch script rendering.

use std::path::{Path, PathBuf};

use ismfold_core::job::JobDescriptor;

/// Render the batch script submitted for `job`.
///
/// Directives come first, then the job's command line verbatim. A GPU
/// request is only emitted when the job asks for at least one GPU.
pub fn render_batch_script(job: &JobDescriptor) -> String {
    let resources = job.resources();
    let gres = if resources.gpus > 0 {
        format!("#SBATCH --gres=gpu:{}\n", resources.gpus)
    } else {
        String::new()
    };

    let mut script = format!(
        "#!/bin/bash\n\n\
         #SBATCH -p {queue}\n\
         #SBATCH -n 1\n\
         #SBATCH -J {name}\n\
         #SBATCH -o {stdout}\n\
         #SBATCH -e {stderr}\n\
         {gres}\
         #SBATCH --mem={mem}\n\
         #SBATCH --time={time}\n",
        queue = job.queue(),
        name = job.name(),
        stdout = job.stdout().display(),
        stderr = job.stderr().display(),
        mem = resources.mem_mb,
        time = resources.time_limit,
    );

    script.push_str("\necho $HOSTNAME\n");
    script.push_str(job.command());
    script.push('\n');
    script
}

/// Path of the script file for `job` inside `script_dir`.
pub fn script_path(script_dir: &Path, job: &JobDescriptor) -> PathBuf {
    let safe: String = job
        .name()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    script_dir.join(format!("{safe}.sb"))
}

#[cfg(test)]
mod tests {
    use ismfold_core::job::Resources;

    use super::*;

    fn job(resources: Resources) -> JobDescriptor {
        JobDescriptor::new(
            ". conda.sh; conda activate tf; saluki_ism_tfr.py /m/params.json".into(),
            "ism_f0_c1".into(),
            "/m/f0_c1/ism.out".into(),
            "/m/f0_c1/ism.err".into(),
            "gtx1080ti".into(),
            resources,
        )
    }

    #[test]
    fn renders_directives_and_command() {
        let script = render_batch_script(&job(Resources::default()));
        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains("#SBATCH -p gtx1080ti\n"));
        assert!(script.contains("#SBATCH -J ism_f0_c1\n"));
        assert!(script.contains("#SBATCH -o /m/f0_c1/ism.out\n"));
        assert!(script.contains("#SBATCH -e /m/f0_c1/ism.err\n"));
        assert!(script.contains("#SBATCH --gres=gpu:1\n"));
        assert!(script.contains("#SBATCH --mem=30000\n"));
        assert!(script.contains("#SBATCH --time=2-0:0:0\n"));
        assert!(script.ends_with("saluki_ism_tfr.py /m/params.json\n"));
    }

    #[test]
    fn full_script_layout() {
        let script = render_batch_script(&job(Resources::default()));
        assert_eq!(
            script,
            "#!/bin/bash\n\n\
             #SBATCH -p gtx1080ti\n\
             #SBATCH -n 1\n\
             #SBATCH -J ism_f0_c1\n\
             #SBATCH -o /m/f0_c1/ism.out\n\
             #SBATCH -e /m/f0_c1/ism.err\n\
             #SBATCH --gres=gpu:1\n\
             #SBATCH --mem=30000\n\
             #SBATCH --time=2-0:0:0\n\
             \n\
             echo $HOSTNAME\n\
             . conda.sh; conda activate tf; saluki_ism_tfr.py /m/params.json\n"
        );
    }

    #[test]
    fn cpu_only_script_keeps_directive_order() {
        let script = render_batch_script(&job(Resources {
            gpus: 0,
            ..Resources::default()
        }));
        assert!(script.contains("#SBATCH -e /m/f0_c1/ism.err\n#SBATCH --mem=30000\n"));
    }

    #[test]
    fn directives_precede_command() {
        let script = render_batch_script(&job(Resources::default()));
        let last_directive = script.rfind("#SBATCH").expect("directive");
        let command = script.find("saluki_ism_tfr.py").expect("command");
        assert!(last_directive < command);
    }

    #[test]
    fn cpu_only_job_has_no_gres() {
        let script = render_batch_script(&job(Resources {
            gpus: 0,
            ..Resources::default()
        }));
        assert!(!script.contains("--gres"));
    }

    #[test]
    fn script_path_sanitizes_name() {
        let mut j = job(Resources::default());
        assert_eq!(
            script_path(Path::new("/s"), &j),
            PathBuf::from("/s/ism_f0_c1.sb")
        );

        j = JobDescriptor::new(
            "true".into(),
            "ism run/f0 c0".into(),
            "/o".into(),
            "/e".into(),
            "q".into(),
            Resources::default(),
        );
        assert_eq!(
            script_path(Path::new("/s"), &j),
            PathBuf::from("/s/ism_run_f0_c0.sb")
        );
    }
}
