use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anchor_lang::prelude::*;
use anchor_lang::solana_program::bpf_loader_upgradeable;
use anchor_lang::event::EVENT_IX_TAG_LE;
use anchor_lang::solana_program::entrypoint::{ProgramResult, SUCCESS};
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program_pack::Pack;
use anchor_lang::solana_program::program_stubs::{set_syscall_stubs, SyscallStubs};
use anchor_lang::solana_program::system_program;
use anchor_spl::token::spl_token;
use anchor_spl::token::spl_token::instruction::TokenInstruction;
use anchor_spl::token::spl_token::state::{Account as TokenState, AccountState, Mint as MintState};

/// Syscall stubs are process-wide, so benches run one at a time
static BENCH_LOCK: Mutex<()> = Mutex::new(());

/// spl-token's InsufficientFunds error code
const TOKEN_INSUFFICIENT_FUNDS: u32 = 1;

/// system program's AccountAlreadyInUse error code
const SYSTEM_ACCOUNT_IN_USE: u32 = 0;

#[derive(Clone, Debug, PartialEq)]
pub struct StoredAccount {
    pub lamports: u64,
    pub data: Vec<u8>,
    pub owner: Pubkey,
    pub executable: bool,
}

impl StoredAccount {
    fn unallocated(space: usize) -> Self {
        StoredAccount {
            lamports: 0,
            data: vec![0; space],
            owner: system_program::ID,
            executable: false,
        }
    }

    fn from_info(info: &AccountInfo) -> Self {
        StoredAccount {
            lamports: info.lamports(),
            data: info.data.borrow().to_vec(),
            owner: *info.owner,
            executable: info.executable,
        }
    }
}

#[derive(Default)]
struct SyscallState {
    now: AtomicI64,
    fail_transfers: AtomicBool,
    return_data: Mutex<Option<Vec<u8>>>,
    events: Mutex<Vec<Vec<u8>>>,
}

/// Serves the syscalls the program makes when it runs off-chain
///
/// Cross-program calls are handled for the system program (account
/// creation), the SPL token program (account init and checked transfers)
/// and the program itself (event self-CPI).
struct BenchSyscalls {
    state: Arc<SyscallState>,
}

fn find_account<'a, 'b>(
    infos: &'a [AccountInfo<'b>],
    key: &Pubkey,
) -> std::result::Result<&'a AccountInfo<'b>, ProgramError> {
    infos
        .iter()
        .find(|info| info.key == key)
        .ok_or(ProgramError::NotEnoughAccountKeys)
}

impl BenchSyscalls {
    fn create_account(&self, instruction: &Instruction, infos: &[AccountInfo]) -> ProgramResult {
        // bincode layout of SystemInstruction::CreateAccount
        let data = &instruction.data;
        if data.len() != 52 || data[..4] != [0, 0, 0, 0] {
            return Err(ProgramError::InvalidInstructionData);
        }
        let lamports = u64::from_le_bytes(data[4..12].try_into().unwrap());
        let space = u64::from_le_bytes(data[12..20].try_into().unwrap()) as usize;
        let owner = Pubkey::new_from_array(data[20..52].try_into().unwrap());

        let target = find_account(infos, &instruction.accounts[1].pubkey)?;
        if *target.owner != system_program::ID || target.lamports() != 0 {
            return Err(ProgramError::Custom(SYSTEM_ACCOUNT_IN_USE));
        }
        // Slots are allocated up front by Bench::reserve
        if target.data_len() != space {
            return Err(ProgramError::InvalidRealloc);
        }

        **target.try_borrow_mut_lamports()? = lamports;
        target.assign(&owner);
        Ok(())
    }

    fn token(&self, instruction: &Instruction, infos: &[AccountInfo]) -> ProgramResult {
        match TokenInstruction::unpack(&instruction.data)? {
            TokenInstruction::InitializeAccount3 { owner } => {
                let target = find_account(infos, &instruction.accounts[0].pubkey)?;
                let state = TokenState {
                    mint: instruction.accounts[1].pubkey,
                    owner,
                    state: AccountState::Initialized,
                    ..TokenState::default()
                };
                TokenState::pack(state, &mut target.try_borrow_mut_data()?)
            }
            TokenInstruction::TransferChecked { amount, .. } => {
                if self.state.fail_transfers.load(Ordering::SeqCst) {
                    return Err(ProgramError::Custom(TOKEN_INSUFFICIENT_FUNDS));
                }
                let source = find_account(infos, &instruction.accounts[0].pubkey)?;
                let destination = find_account(infos, &instruction.accounts[2].pubkey)?;

                let mut from = TokenState::unpack(&source.try_borrow_data()?)?;
                let mut to = TokenState::unpack(&destination.try_borrow_data()?)?;
                if from.amount < amount {
                    return Err(ProgramError::Custom(TOKEN_INSUFFICIENT_FUNDS));
                }
                from.amount -= amount;
                to.amount += amount;

                TokenState::pack(from, &mut source.try_borrow_mut_data()?)?;
                TokenState::pack(to, &mut destination.try_borrow_mut_data()?)
            }
            _ => Err(ProgramError::InvalidInstructionData),
        }
    }
}

impl SyscallStubs for BenchSyscalls {
    fn sol_log(&self, _message: &str) {}

    fn sol_invoke_signed(
        &self,
        instruction: &Instruction,
        account_infos: &[AccountInfo],
        _signers_seeds: &[&[&[u8]]],
    ) -> ProgramResult {
        if instruction.program_id == system_program::ID {
            self.create_account(instruction, account_infos)
        } else if instruction.program_id == spl_token::ID {
            self.token(instruction, account_infos)
        } else if instruction.program_id == crate::ID {
            // Event self-CPI: tag followed by the event's discriminator and body
            if let Some(event) = instruction.data.strip_prefix(EVENT_IX_TAG_LE) {
                self.state.events.lock().unwrap().push(event.to_vec());
            }
            Ok(())
        } else {
            Err(ProgramError::IncorrectProgramId)
        }
    }

    fn sol_get_clock_sysvar(&self, var_addr: *mut u8) -> u64 {
        let clock = Clock {
            unix_timestamp: self.state.now.load(Ordering::SeqCst),
            ..Clock::default()
        };
        unsafe { *(var_addr as *mut Clock) = clock };
        SUCCESS
    }

    fn sol_get_rent_sysvar(&self, var_addr: *mut u8) -> u64 {
        unsafe { *(var_addr as *mut Rent) = Rent::default() };
        SUCCESS
    }

    fn sol_set_return_data(&self, data: &[u8]) {
        *self.state.return_data.lock().unwrap() = Some(data.to_vec());
    }
}

/// In-memory cluster for running the program's instructions end to end
///
/// Each `execute` builds fresh account infos from the stored state, runs the
/// program entrypoint and commits the resulting accounts only on success,
/// the way a failed transaction leaves the ledger untouched. The accounts as
/// the program left them are kept in `last_attempt` either way.
pub struct Bench {
    accounts: HashMap<Pubkey, StoredAccount>,
    last_attempt: HashMap<Pubkey, StoredAccount>,
    state: Arc<SyscallState>,
    _guard: MutexGuard<'static, ()>,
}

impl Bench {
    pub fn new() -> Self {
        let guard = BENCH_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let state = Arc::new(SyscallState::default());
        set_syscall_stubs(Box::new(BenchSyscalls {
            state: state.clone(),
        }));

        let mut bench = Bench {
            accounts: HashMap::new(),
            last_attempt: HashMap::new(),
            state,
            _guard: guard,
        };
        for program in [system_program::ID, spl_token::ID, crate::ID] {
            bench.put(
                program,
                StoredAccount {
                    lamports: 1,
                    data: Vec::new(),
                    owner: bpf_loader_upgradeable::ID,
                    executable: true,
                },
            );
        }
        bench
    }

    pub fn set_time(&self, now: i64) {
        self.state.now.store(now, Ordering::SeqCst);
    }

    pub fn fail_transfers(&self, fail: bool) {
        self.state.fail_transfers.store(fail, Ordering::SeqCst);
    }

    pub fn put(&mut self, key: Pubkey, account: StoredAccount) {
        self.accounts.insert(key, account);
    }

    /// Makes room for an account the program may create at `key`
    pub fn reserve(&mut self, key: Pubkey, space: usize) {
        self.accounts
            .entry(key)
            .or_insert_with(|| StoredAccount::unallocated(space));
    }

    pub fn add_wallet(&mut self) -> Pubkey {
        let key = Pubkey::new_unique();
        self.put(
            key,
            StoredAccount {
                lamports: 10_000_000_000,
                ..StoredAccount::unallocated(0)
            },
        );
        key
    }

    pub fn add_mint(&mut self, decimals: u8) -> Pubkey {
        let key = Pubkey::new_unique();
        let mut data = vec![0; MintState::LEN];
        let mint = MintState {
            decimals,
            is_initialized: true,
            supply: u64::MAX / 2,
            ..MintState::default()
        };
        MintState::pack(mint, &mut data).unwrap();
        self.put(key, token_program_account(data));
        key
    }

    pub fn add_token_account(&mut self, mint: Pubkey, owner: Pubkey, amount: u64) -> Pubkey {
        let key = Pubkey::new_unique();
        let mut data = vec![0; TokenState::LEN];
        let state = TokenState {
            mint,
            owner,
            amount,
            state: AccountState::Initialized,
            ..TokenState::default()
        };
        TokenState::pack(state, &mut data).unwrap();
        self.put(key, token_program_account(data));
        key
    }

    /// Runs one instruction and returns its return data
    pub fn execute(
        &mut self,
        data: Vec<u8>,
        metas: Vec<AccountMeta>,
    ) -> std::result::Result<Option<Vec<u8>>, ProgramError> {
        *self.state.return_data.lock().unwrap() = None;
        self.state.events.lock().unwrap().clear();

        // The entrypoint wants accounts that outlive the call; a test's worth
        // of leaked buffers is fine
        let infos: Vec<AccountInfo<'static>> = metas
            .iter()
            .map(|meta| {
                let stored = self
                    .accounts
                    .get(&meta.pubkey)
                    .cloned()
                    .unwrap_or_else(|| StoredAccount::unallocated(0));
                AccountInfo::new(
                    Box::leak(Box::new(meta.pubkey)),
                    meta.is_signer,
                    meta.is_writable,
                    Box::leak(Box::new(stored.lamports)),
                    Box::leak(stored.data.into_boxed_slice()),
                    Box::leak(Box::new(stored.owner)),
                    stored.executable,
                    0,
                )
            })
            .collect();
        let infos: &'static [AccountInfo<'static>] = Box::leak(infos.into_boxed_slice());

        let result = crate::entry(&crate::ID, infos, &data);

        self.last_attempt = infos
            .iter()
            .map(|info| (*info.key, StoredAccount::from_info(info)))
            .collect();
        if result.is_ok() {
            for (key, account) in &self.last_attempt {
                self.accounts.insert(*key, account.clone());
            }
        }

        result.map(|_| self.state.return_data.lock().unwrap().take())
    }

    pub fn account(&self, key: &Pubkey) -> Option<&StoredAccount> {
        self.accounts.get(key)
    }

    pub fn last_attempt(&self, key: &Pubkey) -> Option<&StoredAccount> {
        self.last_attempt.get(key)
    }

    /// Whether a program-owned account exists at `key`
    pub fn is_created(&self, key: &Pubkey) -> bool {
        self.account(key)
            .is_some_and(|account| account.owner == crate::ID)
    }

    pub fn load<T: AccountDeserialize>(&self, key: &Pubkey) -> T {
        let account = self.account(key).expect("account not found");
        T::try_deserialize(&mut account.data.as_slice()).expect("account does not deserialize")
    }

    /// Events of type `T` emitted by the last executed instruction
    pub fn emitted<T: anchor_lang::Event>(&self) -> Vec<T> {
        self.state
            .events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|data| data.strip_prefix(T::DISCRIMINATOR))
            .map(|body| T::try_from_slice(body).expect("event does not deserialize"))
            .collect()
    }

    pub fn token_balance(&self, key: &Pubkey) -> u64 {
        let account = self.account(key).expect("token account not found");
        TokenState::unpack(&account.data).expect("not a token account").amount
    }
}

fn token_program_account(data: Vec<u8>) -> StoredAccount {
    StoredAccount {
        lamports: 1_000_000_000,
        data,
        owner: spl_token::ID,
        executable: false,
    }
}
