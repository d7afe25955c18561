// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/workloads/queue.rs
// Version: 1.0.2
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the multi-buffer job queue used by the crypto family.
// Submitted jobs occupy lanes; once every lane is busy the whole batch is
// advanced together, one chunk of input per lane in turn, the way a SIMD
// multi-buffer manager interleaves its streams. Flushing completes a partial
// batch. Every job is also computable on its own, in one pass, which is what
// the replica path uses.
//
// Tree Location:
// - src/workloads/queue.rs (JobQueue, Job, JobKind, KeyMaterial)
// - Depends on: aes, cbc, ctr, cmac, hmac, md-5, sha1, sha2, sha3

use crate::Result;
use crate::core::error::StressError;
use aes::cipher::block_padding::NoPadding;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncryptMut, KeyIvInit, StreamCipher};
use aes::{Aes128, Aes256};
use cmac::Cmac;
use des::Des;
use hmac::{Hmac, Mac};
use md5::Md5;
use rand::Rng;
use sha1::Sha1;
use sha2::{Digest, Sha512};
use sha3::Sha3_256;

type Aes256Ctr = ctr::Ctr64BE<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type DesCbcEnc = cbc::Encryptor<Des>;

/// Bytes each lane consumes per interleaving step
pub const LANE_CHUNK: usize = 64;

const AES_BLOCK: usize = 16;

const DES_BLOCK: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Cmac,
    Ctr,
    Cbc,
    Des,
    HmacMd5,
    HmacSha1,
    HmacSha512,
    Sha512,
    Sha3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: usize,
    pub kind: JobKind,
    pub status: JobStatus,
    /// Tag or digest; cipher jobs report their ciphertext folded to one block
    pub output: Vec<u8>,
}

impl Job {
    pub fn new(id: usize, kind: JobKind) -> Self {
        Self {
            id,
            kind,
            status: JobStatus::Pending,
            output: Vec::new(),
        }
    }
}

/// Keys and IV shared by every job of one scratch
#[derive(Debug, Clone, Copy)]
pub struct KeyMaterial {
    pub aes128: [u8; 16],
    pub aes256: [u8; 32],
    pub iv: [u8; 16],
    pub des: [u8; 8],
    pub hmac: [u8; 64],
}

impl KeyMaterial {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut keys = Self {
            aes128: [0; 16],
            aes256: [0; 32],
            iv: [0; 16],
            des: [0; 8],
            hmac: [0; 64],
        };
        rng.fill(&mut keys.aes128);
        rng.fill(&mut keys.aes256);
        rng.fill(&mut keys.iv);
        rng.fill(&mut keys.des);
        rng.fill(&mut keys.hmac[..]);
        keys
    }

    /// IV of job `id`: the shared IV with the job id mixed into its tail
    pub fn job_iv(&self, id: usize) -> [u8; 16] {
        let mut iv = self.iv;
        for (byte, id_byte) in iv[8..].iter_mut().zip((id as u64).to_be_bytes()) {
            *byte ^= id_byte;
        }
        iv
    }

    /// DES IV of job `id`, the half of [`KeyMaterial::job_iv`] carrying the id
    pub fn des_iv(&self, id: usize) -> [u8; DES_BLOCK] {
        let mut iv = [0u8; DES_BLOCK];
        iv.copy_from_slice(&self.job_iv(id)[8..]);
        iv
    }
}

fn key_error(e: impl std::fmt::Display) -> StressError {
    StressError::Resource {
        label: "ipsec",
        reason: e.to_string(),
    }
}

/// XOR of all 16 byte blocks
fn fold_blocks(buf: &[u8], tag: &mut [u8; AES_BLOCK]) {
    for block in buf.chunks(AES_BLOCK) {
        for (t, b) in tag.iter_mut().zip(block) {
            *t ^= b;
        }
    }
}

/// Incremental state of a job occupying a lane
enum LaneState {
    Cmac(Box<Cmac<Aes128>>),
    Ctr(Box<Aes256Ctr>, [u8; AES_BLOCK]),
    Cbc(Box<Aes256CbcEnc>, [u8; AES_BLOCK]),
    Des(Box<DesCbcEnc>, [u8; AES_BLOCK]),
    HmacMd5(Hmac<Md5>),
    HmacSha1(Hmac<Sha1>),
    HmacSha512(Box<Hmac<Sha512>>),
    Sha512(Sha512),
    Sha3(Sha3_256),
}

impl LaneState {
    fn begin(job: &Job, keys: &KeyMaterial) -> Result<Self> {
        let iv = keys.job_iv(job.id);
        Ok(match job.kind {
            JobKind::Cmac => LaneState::Cmac(Box::new(
                <Cmac<Aes128> as Mac>::new_from_slice(&keys.aes128).map_err(key_error)?,
            )),
            JobKind::Ctr => LaneState::Ctr(
                Box::new(Aes256Ctr::new(&keys.aes256.into(), &iv.into())),
                [0; AES_BLOCK],
            ),
            JobKind::Cbc => LaneState::Cbc(
                Box::new(Aes256CbcEnc::new(&keys.aes256.into(), &iv.into())),
                [0; AES_BLOCK],
            ),
            JobKind::Des => LaneState::Des(
                Box::new(DesCbcEnc::new(&keys.des.into(), &keys.des_iv(job.id).into())),
                [0; AES_BLOCK],
            ),
            JobKind::HmacMd5 => {
                LaneState::HmacMd5(<Hmac<Md5> as Mac>::new_from_slice(&keys.hmac).map_err(key_error)?)
            }
            JobKind::HmacSha1 => {
                LaneState::HmacSha1(<Hmac<Sha1> as Mac>::new_from_slice(&keys.hmac).map_err(key_error)?)
            }
            JobKind::HmacSha512 => LaneState::HmacSha512(Box::new(
                <Hmac<Sha512> as Mac>::new_from_slice(&keys.hmac).map_err(key_error)?,
            )),
            JobKind::Sha512 => LaneState::Sha512(Sha512::new()),
            JobKind::Sha3 => LaneState::Sha3(Sha3_256::new()),
        })
    }

    /// Feeds one chunk; cipher chunks must be whole AES blocks.
    fn absorb(&mut self, chunk: &[u8]) {
        match self {
            LaneState::Cmac(mac) => Mac::update(&mut **mac, chunk),
            LaneState::Ctr(cipher, tag) => {
                let mut buf = [0u8; LANE_CHUNK];
                let buf = &mut buf[..chunk.len()];
                buf.copy_from_slice(chunk);
                cipher.apply_keystream(buf);
                fold_blocks(buf, tag);
            }
            LaneState::Cbc(cipher, tag) => {
                let mut buf = [0u8; LANE_CHUNK];
                let buf = &mut buf[..chunk.len()];
                buf.copy_from_slice(chunk);
                for block in buf.chunks_exact_mut(AES_BLOCK) {
                    cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
                }
                fold_blocks(buf, tag);
            }
            LaneState::Des(cipher, tag) => {
                let mut buf = [0u8; LANE_CHUNK];
                let buf = &mut buf[..chunk.len()];
                buf.copy_from_slice(chunk);
                for block in buf.chunks_exact_mut(DES_BLOCK) {
                    cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
                }
                fold_blocks(buf, tag);
            }
            LaneState::HmacMd5(mac) => Mac::update(mac, chunk),
            LaneState::HmacSha1(mac) => Mac::update(mac, chunk),
            LaneState::HmacSha512(mac) => Mac::update(&mut **mac, chunk),
            LaneState::Sha512(hash) => Digest::update(hash, chunk),
            LaneState::Sha3(hash) => Digest::update(hash, chunk),
        }
    }

    fn finish(self) -> Vec<u8> {
        match self {
            LaneState::Cmac(mac) => (*mac).finalize().into_bytes().to_vec(),
            LaneState::Ctr(_, tag) | LaneState::Cbc(_, tag) | LaneState::Des(_, tag) => tag.to_vec(),
            LaneState::HmacMd5(mac) => mac.finalize().into_bytes().to_vec(),
            LaneState::HmacSha1(mac) => mac.finalize().into_bytes().to_vec(),
            LaneState::HmacSha512(mac) => (*mac).finalize().into_bytes().to_vec(),
            LaneState::Sha512(hash) => hash.finalize().to_vec(),
            LaneState::Sha3(hash) => hash.finalize().to_vec(),
        }
    }
}

/// Computes one job in a single pass over `data`, outside any queue.
pub fn compute_direct(kind: JobKind, id: usize, keys: &KeyMaterial, data: &[u8]) -> Result<Vec<u8>> {
    let iv = keys.job_iv(id);
    Ok(match kind {
        JobKind::Cmac => {
            let mut mac = <Cmac<Aes128> as Mac>::new_from_slice(&keys.aes128).map_err(key_error)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        JobKind::Ctr => {
            let mut buf = data.to_vec();
            Aes256Ctr::new(&keys.aes256.into(), &iv.into()).apply_keystream(&mut buf);
            let mut tag = [0u8; AES_BLOCK];
            fold_blocks(&buf, &mut tag);
            tag.to_vec()
        }
        JobKind::Cbc => {
            let mut buf = data.to_vec();
            let len = buf.len();
            let ciphertext = Aes256CbcEnc::new(&keys.aes256.into(), &iv.into())
                .encrypt_padded_mut::<NoPadding>(&mut buf, len)
                .map_err(|_| key_error("cbc input is not a whole number of blocks"))?;
            let mut tag = [0u8; AES_BLOCK];
            fold_blocks(ciphertext, &mut tag);
            tag.to_vec()
        }
        JobKind::Des => {
            let mut buf = data.to_vec();
            let len = buf.len();
            let ciphertext = DesCbcEnc::new(&keys.des.into(), &keys.des_iv(id).into())
                .encrypt_padded_mut::<NoPadding>(&mut buf, len)
                .map_err(|_| key_error("des input is not a whole number of blocks"))?;
            let mut tag = [0u8; AES_BLOCK];
            fold_blocks(ciphertext, &mut tag);
            tag.to_vec()
        }
        JobKind::HmacMd5 => {
            let mut mac = <Hmac<Md5> as Mac>::new_from_slice(&keys.hmac).map_err(key_error)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        JobKind::HmacSha1 => {
            let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(&keys.hmac).map_err(key_error)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        JobKind::HmacSha512 => {
            let mut mac = <Hmac<Sha512> as Mac>::new_from_slice(&keys.hmac).map_err(key_error)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        JobKind::Sha512 => Sha512::digest(data).to_vec(),
        JobKind::Sha3 => Sha3_256::digest(data).to_vec(),
    })
}

struct InFlight {
    job: Job,
    state: LaneState,
}

/// Submission and completion counters of a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStatus {
    pub submitted: usize,
    pub completed: usize,
    pub pending: usize,
}

pub struct JobQueue {
    lanes: usize,
    in_flight: Vec<InFlight>,
    completed: Vec<Job>,
    submitted: usize,
    finished: usize,
}

impl JobQueue {
    pub fn new(lanes: usize) -> Self {
        let lanes = lanes.max(1);
        Self {
            lanes,
            in_flight: Vec::with_capacity(lanes),
            completed: Vec::new(),
            submitted: 0,
            finished: 0,
        }
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// Puts `job` in a free lane. When this fills the last lane the batch is
    /// run to completion.
    pub fn submit(&mut self, mut job: Job, keys: &KeyMaterial, data: &[u8]) -> Result<()> {
        let state = LaneState::begin(&job, keys)?;
        job.status = JobStatus::Pending;
        self.in_flight.push(InFlight { job, state });
        self.submitted += 1;
        if self.in_flight.len() >= self.lanes {
            self.run_batch(data);
        }
        Ok(())
    }

    /// Completes the jobs of a partially filled batch.
    pub fn flush(&mut self, data: &[u8]) {
        if !self.in_flight.is_empty() {
            self.run_batch(data);
        }
    }

    /// Hands back every completed job.
    pub fn drain(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.completed)
    }

    pub fn completion_status(&self) -> QueueStatus {
        QueueStatus {
            submitted: self.submitted,
            completed: self.finished,
            pending: self.in_flight.len(),
        }
    }

    /// Forgets counters and any undrained jobs.
    pub fn reset(&mut self) {
        self.in_flight.clear();
        self.completed.clear();
        self.submitted = 0;
        self.finished = 0;
    }

    fn run_batch(&mut self, data: &[u8]) {
        for chunk in data.chunks(LANE_CHUNK) {
            for lane in self.in_flight.iter_mut() {
                lane.state.absorb(chunk);
            }
        }
        for InFlight { mut job, state } in self.in_flight.drain(..) {
            job.output = state.finish();
            job.status = JobStatus::Completed;
            self.finished += 1;
            self.completed.push(job);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const KINDS: [JobKind; 9] = [
        JobKind::Cmac,
        JobKind::Ctr,
        JobKind::Cbc,
        JobKind::Des,
        JobKind::HmacMd5,
        JobKind::HmacSha1,
        JobKind::HmacSha512,
        JobKind::Sha512,
        JobKind::Sha3,
    ];

    fn fixture() -> (KeyMaterial, Vec<u8>) {
        let mut rng = StdRng::seed_from_u64(42);
        let keys = KeyMaterial::random(&mut rng);
        let mut data = vec![0u8; 1024];
        rng.fill(&mut data[..]);
        (keys, data)
    }

    #[test]
    fn test_batch_completes_when_lanes_fill() {
        let (keys, data) = fixture();
        let mut queue = JobQueue::new(4);
        for id in 0..3 {
            queue.submit(Job::new(id, JobKind::Sha512), &keys, &data).unwrap();
        }
        assert_eq!(queue.completion_status().pending, 3);
        queue.submit(Job::new(3, JobKind::Sha512), &keys, &data).unwrap();
        let status = queue.completion_status();
        assert_eq!((status.submitted, status.completed, status.pending), (4, 4, 0));
    }

    #[test]
    fn test_flush_completes_partial_batch() {
        let (keys, data) = fixture();
        let mut queue = JobQueue::new(8);
        for id in 0..5 {
            queue.submit(Job::new(id, JobKind::Ctr), &keys, &data).unwrap();
        }
        queue.flush(&data);
        let jobs = queue.drain();
        assert_eq!(jobs.len(), 5);
        assert!(jobs.iter().all(|j| j.status == JobStatus::Completed));
        assert!(queue.drain().is_empty(), "drain must hand jobs back once");
    }

    #[test]
    fn test_queued_matches_direct() {
        let (keys, data) = fixture();
        for kind in KINDS {
            let mut queue = JobQueue::new(4);
            for id in 0..6 {
                queue.submit(Job::new(id, kind), &keys, &data).unwrap();
            }
            queue.flush(&data);
            for job in queue.drain() {
                let direct = compute_direct(kind, job.id, &keys, &data).unwrap();
                assert_eq!(job.output, direct, "{:?} job {} differs", kind, job.id);
            }
        }
    }

    #[test]
    fn test_known_des_block() {
        let mut keys = KeyMaterial::random(&mut StdRng::seed_from_u64(1));
        keys.iv = [0; 16];
        keys.des = hex::decode("133457799bbcdff1").unwrap().try_into().unwrap();
        let plaintext = hex::decode("0123456789abcdef").unwrap();
        let tag = compute_direct(JobKind::Des, 0, &keys, &plaintext).unwrap();
        assert_eq!(hex::encode(&tag[..8]), "85e813540f0ab405", "classic DES test vector");
        assert_eq!(&tag[8..], &[0u8; 8], "one block folds into the first half");
    }

    #[test]
    fn test_known_sha512_digest() {
        let keys = KeyMaterial::random(&mut StdRng::seed_from_u64(1));
        let digest = compute_direct(JobKind::Sha512, 0, &keys, b"abc").unwrap();
        assert_eq!(
            hex::encode(&digest[..8]),
            "ddaf35a193617aba",
            "SHA-512 of 'abc' starts with ddaf35a193617aba"
        );
    }
}

// Changelog:
// - v1.0.2 (2026-10-19): DES-CBC jobs.
// - v1.0.1 (2026-10-19): Cipher jobs fold their ciphertext to one block so
//   large job counts stay within memory.
// - v1.0.0 (2026-10-19): Initial multi-buffer job queue.
