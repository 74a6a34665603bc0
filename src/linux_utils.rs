/**********************************/
/*      UTILITIES FOR LINUX       */
/**********************************/

use crate::attributes::Policy;

/// Kernel thread id of the caller, as listed by ps -L.
pub fn get_platform_tid () -> u32
{
    unsafe
        {
            libc::gettid () as u32
        }
}

/// Pin the calling thread to `cpu`. EINVAL when `cpu` does not fit a cpu_set_t.
pub fn set_affinity (cpu: usize) -> std::io::Result<()>
{
    if cpu >= libc::CPU_SETSIZE as usize
    {
        return Err (std::io::Error::from_raw_os_error (libc::EINVAL));
    }
    unsafe
        {
            let tid = libc::gettid ();
            let mut cpuset : libc::cpu_set_t = std::mem::zeroed ();
            libc::CPU_ZERO (&mut cpuset);
            libc::CPU_SET (cpu, &mut cpuset);
            if libc::sched_setaffinity (tid, size_of::<libc::cpu_set_t> (), &cpuset) != 0
            {
                return Err (std::io::Error::last_os_error ());
            }
        }
    Ok (())
}

/// Set the live policy and priority of the calling thread.
/// Real-time policies need CAP_SYS_NICE or an RLIMIT_RTPRIO allowance.
pub fn set_thread_schedule (policy: Policy, priority: i32) -> std::io::Result<()>
{
    let sched_param = libc::sched_param
    {
        sched_priority: priority as libc::c_int,
    };
    let code = unsafe
        {
            libc::pthread_setschedparam (libc::pthread_self (), policy.to_raw (), &sched_param)
        };
    crate::scheduler::check (code)
}

/// The live policy and priority of the calling thread.
pub fn current_thread_schedule () -> std::io::Result<(Policy, i32)>
{
    let mut raw_policy : libc::c_int = 0;
    let mut sched_param : libc::sched_param = unsafe { std::mem::zeroed () };
    let code = unsafe
        {
            libc::pthread_getschedparam (libc::pthread_self (), &mut raw_policy, &mut sched_param)
        };
    crate::scheduler::check (code)?;

    let policy = Policy::from_raw (raw_policy)
        .ok_or_else (|| crate::scheduler::unrecognized ("policy", raw_policy))?;
    Ok ((policy, sched_param.sched_priority))
}

/// Command an operator can run to see the worker's live class.
pub fn inspection_hint () -> String
{
    format! ("ps -eLo state,uid,pid,lwp,rtprio,time,policy,comm -q {}",
             std::process::id ())
}
